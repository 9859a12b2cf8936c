//! Chart rendering (plotters)
//!
//! Every renderer draws into an RGB buffer and returns PNG bytes, ready to be
//! written to disk or embedded in the PDF dashboard.

use plotters::prelude::*;
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};

use crate::analysis::stats::{CorrelationMatrix, HistogramBin};

const COLOR_PRIMARY: RGBColor = RGBColor(31, 119, 180);
const COLOR_SECONDARY: RGBColor = RGBColor(255, 127, 14);

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(png_bytes)
}

/// Label for an integer tick, empty between categories
fn category_label(labels: &[String], x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 || x < -0.5 {
        return String::new();
    }
    labels.get(x.round() as usize).cloned().unwrap_or_default()
}

/// Two bars per category, e.g. grade shares for all recipes vs. a subset
pub fn grouped_bar_chart(
    title: &str,
    categories: &[String],
    series: [(&str, &[f64]); 2],
    y_desc: &str,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    if categories.is_empty() {
        return Err("No data to chart".to_string());
    }
    let n = categories.len();
    let y_max = series
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0f64..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(categories, *x))
            .y_desc(y_desc)
            .draw()
            .map_err(|e| e.to_string())?;

        for (s, ((name, values), color)) in series.iter().zip([COLOR_PRIMARY, COLOR_SECONDARY]).enumerate() {
            let offset = if s == 0 { -0.4 } else { 0.0 };
            chart
                .draw_series(values.iter().enumerate().map(|(i, v)| {
                    let x0 = i as f64 + offset;
                    Rectangle::new([(x0, 0.0), (x0 + 0.4, *v)], color.filled())
                }))
                .map_err(|e| e.to_string())?
                .label(*name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

/// Horizontal bars, first item on top
pub fn bar_chart(
    title: &str,
    items: &[(String, f64)],
    x_desc: &str,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    if items.is_empty() {
        return Err("No data to chart".to_string());
    }
    let n = items.len();
    let x_max = items.iter().map(|(_, v)| *v).fold(0.0f64, f64::max).max(1e-9) * 1.05;
    // Reverse so the first item is drawn at the top
    let labels: Vec<String> = items.iter().rev().map(|(l, _)| l.clone()).collect();

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(180)
            .build_cartesian_2d(0.0f64..x_max, -0.5f64..(n as f64 - 0.5))
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|y| category_label(&labels, *y))
            .x_desc(x_desc)
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(items.iter().rev().enumerate().map(|(i, (_, v))| {
                let y = i as f64;
                Rectangle::new([(0.0, y - 0.35), (*v, y + 0.35)], COLOR_PRIMARY.filled())
            }))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

/// Blue (-1) to white (0) to red (+1)
fn diverging_color(v: f64) -> RGBColor {
    if v.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = v.clamp(-1.0, 1.0);
    let fade = |c: u8, k: f64| (255.0 - (255.0 - c as f64) * k) as u8;
    if t >= 0.0 {
        RGBColor(fade(214, t), fade(39, t), fade(40, t))
    } else {
        RGBColor(fade(31, -t), fade(119, -t), fade(180, -t))
    }
}

/// Annotated correlation heatmap
pub fn heatmap(title: &str, matrix: &CorrelationMatrix, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let n = matrix.labels.len();
    if n == 0 {
        return Err("No data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(120)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), -0.5f64..(n as f64 - 0.5))
            .map_err(|e| e.to_string())?;

        let row_labels: Vec<String> = matrix.labels.iter().rev().cloned().collect();
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| category_label(&matrix.labels, *x))
            .y_label_formatter(&|y| category_label(&row_labels, *y))
            .draw()
            .map_err(|e| e.to_string())?;

        let cells = (0..n).flat_map(|i| (0..n).map(move |j| (i, j)));
        chart
            .draw_series(cells.clone().map(|(i, j)| {
                // Row 0 at the top
                let y = (n - 1 - i) as f64;
                let x = j as f64;
                Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    diverging_color(matrix.values[i][j]).filled(),
                )
            }))
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(cells.map(|(i, j)| {
                let y = (n - 1 - i) as f64;
                Text::new(
                    format!("{:.2}", matrix.values[i][j]),
                    (j as f64 - 0.15, y),
                    ("sans-serif", 14).into_font().color(&BLACK),
                )
            }))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

pub fn histogram_chart(
    title: &str,
    bins: &[HistogramBin],
    x_desc: &str,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err("No data to chart".to_string());
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(first.start..last.end, 0.0f64..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Recipes")
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], COLOR_PRIMARY.mix(0.8).filled())
            }))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&labels, 1.0), "B");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }

    #[test]
    fn test_diverging_color_endpoints() {
        assert_eq!(diverging_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging_color(1.0), RGBColor(214, 39, 40));
        assert_eq!(diverging_color(-1.0), RGBColor(31, 119, 180));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(bar_chart("t", &[], "x", 200, 100).is_err());
        assert!(histogram_chart("t", &[], "x", 200, 100).is_err());
    }
}
