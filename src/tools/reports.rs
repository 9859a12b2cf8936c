//! Report generation tools
//!
//! Render the dashboard charts and assemble them into a PDF report with the
//! Nutri-Score, food/drink, tag, ingredient and complexity sections.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use printpdf::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::ingredients::{top_cooccurrences_for, Neighbour};
use crate::analysis::tags::TagOfInterest;
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::models::Grade;
use crate::tools::charts::{bar_chart, grouped_bar_chart, heatmap, histogram_chart};
use crate::tools::complexity::{complexity_summary, ComplexitySummaryResponse};
use crate::tools::foods::{food_drink_split, FoodDrinkResponse};
use crate::tools::ingredients::{top_ingredients, IngredientCountsResponse};
use crate::tools::nutriscore::{nutriscore_overview, NutriScoreOverviewResponse};
use crate::tools::tags::{find_best_tags, tag_statistics, BestTagsResponse, TagStatisticsResponse};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 60);
const COLOR_SECTION: (u8, u8, u8) = (31, 119, 180);
const COLOR_ERROR: (u8, u8, u8) = (255, 0, 0);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

/// Official Nutri-Score palette, A to E
const GRADE_COLORS: [(u8, u8, u8); 5] = [
    (3, 129, 65),
    (133, 187, 47),
    (254, 203, 2),
    (238, 129, 0),
    (230, 62, 17),
];

// Landscape letter
const PAGE_WIDTH: f32 = 279.4;
const PAGE_HEIGHT: f32 = 215.9;
const MARGIN_LEFT: f32 = 15.0;

const CHART_WIDE: (u32, u32) = (1000, 400);
const CHART_GRADES: (u32, u32) = (560, 360);
const CHART_HALF: (u32, u32) = (600, 420);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub total_recipes: usize,
    pub pages: usize,
    pub charts_embedded: usize,
    pub chart_errors: Vec<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ExportChartsResponse {
    pub success: bool,
    pub directory: String,
    pub files: Vec<String>,
    pub chart_errors: Vec<String>,
}

// ============================================================================
// Dashboard Data
// ============================================================================

/// Every figure the dashboard shows, computed once
pub struct DashboardData {
    pub nutriscore: NutriScoreOverviewResponse,
    pub split: FoodDrinkResponse,
    pub tags: TagStatisticsResponse,
    pub best_tags: Option<BestTagsResponse>,
    pub ingredients: IngredientCountsResponse,
    /// Jaccard neighbours of the most used ingredient present in the matrices
    pub neighbours: Option<(String, Vec<Neighbour>)>,
    pub complexity: ComplexitySummaryResponse,
}

impl DashboardData {
    pub fn compute(dataset: &Dataset, config: &AppConfig) -> Result<Self, String> {
        let ingredients = top_ingredients(dataset, config.ingredients.top_n)?;
        let neighbours = ingredients
            .ingredients
            .iter()
            .find(|c| dataset.co_occurrence.position(&c.ingredient).is_some())
            .and_then(|c| {
                top_cooccurrences_for(
                    &c.ingredient,
                    &dataset.jaccard,
                    &dataset.co_occurrence,
                    config.ingredients.neighbours_k,
                    config.ingredients.min_co,
                )
                .ok()
                .map(|n| (c.ingredient.clone(), n))
            });

        Ok(Self {
            nutriscore: nutriscore_overview(dataset, config, 10)?,
            split: food_drink_split(dataset, config, 10)?,
            tags: tag_statistics(dataset, config, None)?,
            best_tags: find_best_tags(dataset, config, None, 5).ok(),
            ingredients,
            neighbours,
            complexity: complexity_summary(dataset, config)?,
        })
    }
}

/// A rendered chart, or why it could not be rendered
pub struct RenderedChart {
    pub name: &'static str,
    pub png: Result<Vec<u8>, String>,
}

fn grade_labels() -> Vec<String> {
    Grade::ALL.iter().map(|g| g.as_str().to_string()).collect()
}

/// Render every dashboard chart in report order
pub fn render_charts(data: &DashboardData) -> Vec<RenderedChart> {
    let mut charts = Vec::new();
    let health = &data.nutriscore.health;

    let tagged_label = format!("'{}' tagged", health.keyword);
    for (name, title, comparison) in [
        ("nutriscore_grades", "Nutri-Score, all recipes", health),
        ("nutriscore_grades_food", "Nutri-Score, food only", &data.nutriscore.food_health),
    ] {
        let all: Vec<f64> = comparison.all.iter().map(|g| g.percent).collect();
        let tagged: Vec<f64> = comparison.health.iter().map(|g| g.percent).collect();
        charts.push(RenderedChart {
            name,
            png: grouped_bar_chart(
                title,
                &grade_labels(),
                [("All", all.as_slice()), (tagged_label.as_str(), tagged.as_slice())],
                "% of recipes",
                CHART_GRADES.0,
                CHART_GRADES.1,
            ),
        });
    }

    charts.push(RenderedChart {
        name: "nutrient_correlation",
        png: heatmap(
            "Nutrient correlation",
            &data.nutriscore.nutrient_correlation,
            CHART_HALF.0,
            CHART_HALF.1,
        ),
    });

    let top_tags: Vec<(String, f64)> = data
        .tags
        .statistics
        .top_tags
        .iter()
        .map(|t| (t.tag.clone(), t.count as f64))
        .collect();
    charts.push(RenderedChart {
        name: "top_tags",
        png: bar_chart("Most frequent tags", &top_tags, "Occurrences", CHART_WIDE.0, CHART_WIDE.1),
    });

    charts.push(RenderedChart {
        name: "tags_per_recipe",
        png: histogram_chart(
            "Tags per recipe",
            &data.tags.tags_per_recipe_histogram,
            "Tags",
            CHART_HALF.0,
            CHART_HALF.1,
        ),
    });

    let top_ingredients: Vec<(String, f64)> = data
        .ingredients
        .ingredients
        .iter()
        .map(|c| (c.ingredient.clone(), c.count as f64))
        .collect();
    charts.push(RenderedChart {
        name: "top_ingredients",
        png: bar_chart("Most used ingredients", &top_ingredients, "Occurrences", CHART_WIDE.0, CHART_WIDE.1),
    });

    if let Some((focus, neighbours)) = &data.neighbours {
        let items: Vec<(String, f64)> = neighbours.iter().map(|n| (n.ingredient.clone(), n.score)).collect();
        charts.push(RenderedChart {
            name: "ingredient_neighbours",
            png: bar_chart(
                &format!("Closest to '{}' (Jaccard)", focus),
                &items,
                "Jaccard",
                CHART_HALF.0,
                CHART_HALF.1,
            ),
        });
    }

    for (name, summary) in ["complexity_minutes", "complexity_steps", "complexity_ingredients"]
        .into_iter()
        .zip(&data.complexity.features)
    {
        charts.push(RenderedChart {
            name,
            png: histogram_chart(
                &format!("Distribution of {}", summary.plotted_feature),
                &summary.histogram,
                summary.plotted_feature.as_str(),
                CHART_HALF.0,
                CHART_HALF.1,
            ),
        });
    }

    charts.push(RenderedChart {
        name: "complexity_correlation",
        png: heatmap(
            "Time / steps / ingredients correlation",
            &data.complexity.correlation,
            CHART_HALF.0,
            CHART_HALF.1,
        ),
    });

    charts
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None))
}

fn add_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, x: Mm, y: Mm, size: f32, color: (u8, u8, u8)) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(layer: &PdfLayerReference, x1: Mm, y1: Mm, x2: Mm, y2: Mm, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y1), false), (Point::new(x2, y2), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Place a PNG with its lower-left corner at (x, y); 120 DPI keeps a
/// 1000 px chart about 212 mm wide.
fn add_png(layer: &PdfLayerReference, png: &[u8], x: f32, y: f32) -> Result<(), String> {
    let dynamic_image = printpdf::image_crate::load_from_memory(png).map_err(|e| e.to_string())?;
    let pdf_image = Image::from_dynamic_image(&dynamic_image);
    let transform = ImageTransform {
        translate_x: Some(Mm(x)),
        translate_y: Some(Mm(y)),
        dpi: Some(120.0),
        ..Default::default()
    };
    pdf_image.add_to_layer(layer.clone(), transform);
    Ok(())
}

/// Pixel height at 120 DPI in millimetres
fn px_to_mm(px: u32) -> f32 {
    px as f32 / 120.0 * 25.4
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Embed the named chart, or print the rendering error in its place
fn place_chart(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    charts: &[RenderedChart],
    name: &str,
    x: f32,
    y: f32,
    embedded: &mut usize,
) {
    let Some(chart) = charts.iter().find(|c| c.name == name) else {
        return;
    };
    let result = chart
        .png
        .as_ref()
        .map_err(|e| e.clone())
        .and_then(|png| add_png(layer, png, x, y));
    match result {
        Ok(()) => *embedded += 1,
        Err(e) => add_text(
            layer,
            &fonts.regular,
            &format!("Chart '{}' unavailable: {}", name, e),
            Mm(x),
            Mm(y + 10.0),
            9.0,
            COLOR_ERROR,
        ),
    }
}

fn page_header(layer: &PdfLayerReference, fonts: &Fonts, title: &str) -> f32 {
    let mut y = PAGE_HEIGHT - 20.0;
    add_text(layer, &fonts.bold, title, Mm(MARGIN_LEFT), Mm(y), 16.0, COLOR_SECTION);
    y -= 4.0;
    add_line(layer, Mm(MARGIN_LEFT), Mm(y), Mm(PAGE_WIDTH - MARGIN_LEFT), Mm(y), COLOR_GRAY, 0.5);
    y - 8.0
}

// ============================================================================
// Dashboard Report Generation
// ============================================================================

/// Generate the dashboard PDF report
pub fn generate_dashboard_report(
    dataset: &Dataset,
    config: &AppConfig,
    output_path: &str,
) -> Result<GenerateReportResponse, String> {
    if dataset.recipes.is_empty() {
        return Err("Dataset is empty, nothing to report".to_string());
    }

    let data = DashboardData::compute(dataset, config)?;
    let charts = render_charts(&data);
    let chart_errors: Vec<String> = charts
        .iter()
        .filter_map(|c| c.png.as_ref().err().map(|e| format!("{}: {}", c.name, e)))
        .collect();
    for e in &chart_errors {
        warn!("Chart rendering failed: {}", e);
    }

    let (doc, page1, layer1) = PdfDocument::new("Recipe Dashboard", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| e.to_string())?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| e.to_string())?,
    };
    let mut embedded = 0usize;

    // ========================================================================
    // Page 1 - Nutri-Score
    // ========================================================================
    let layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT - 20.0;
    add_text(&layer, &fonts.bold, "Recipe Dashboard", Mm(MARGIN_LEFT), Mm(y), 18.0, COLOR_TITLE);
    let now = chrono::Local::now().format("%Y-%m-%d").to_string();
    add_text(&layer, &fonts.regular, &format!("Generated: {}", now), Mm(200.0), Mm(y), 11.0, COLOR_BLACK);
    y -= 8.0;

    let ns = &data.nutriscore;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "{} recipes, {} within nutrition limits ({} excluded)",
            ns.total_recipes, ns.within_limits, ns.excluded_by_limits
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 4.0;
    add_line(&layer, Mm(MARGIN_LEFT), Mm(y), Mm(PAGE_WIDTH - MARGIN_LEFT), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    add_text(&layer, &fonts.bold, "Nutri-Score", Mm(MARGIN_LEFT), Mm(y), 12.0, COLOR_SECTION);
    y -= 7.0;
    let mut x = MARGIN_LEFT;
    for (share, color) in ns.distribution.iter().zip(GRADE_COLORS) {
        add_text(
            &layer,
            &fonts.bold,
            &format!("{}: {} ({:.1}%)", share.grade, share.count, share.percent),
            Mm(x),
            Mm(y),
            10.0,
            color,
        );
        x += 48.0;
    }
    y -= 6.0;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "Food only: {} food / {} drink recipes, {} food recipes within limits",
            ns.food_recipes, ns.drink_recipes, ns.food_within_limits
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 5.0;
    let low = &ns.low_scores;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "{} of {} D/E food recipes carry a '{}' tag",
            low.health_tagged_low, low.total_low, low.keyword
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 5.0 + px_to_mm(CHART_GRADES.1);
    place_chart(&layer, &fonts, &charts, "nutriscore_grades", MARGIN_LEFT, y, &mut embedded);
    place_chart(
        &layer,
        &fonts,
        &charts,
        "nutriscore_grades_food",
        MARGIN_LEFT + px_to_mm(CHART_GRADES.0) + 5.0,
        y,
        &mut embedded,
    );

    // ========================================================================
    // Page 2 - Nutrients and food / drink split
    // ========================================================================
    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Nutrients");
    let layer = doc.get_page(page).get_layer(layer_idx);
    let mut y = page_header(&layer, &fonts, "Nutrients and drinks");

    let split = &data.split.summary;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "Food: {}   Drinks: {} ({:.1}%)",
            split.food_recipes, split.drink_recipes, split.drink_share_percent
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 6.0;
    add_text(
        &layer,
        &fonts.regular,
        &format!("Drink keywords: {}", data.split.keywords.join(", ")),
        Mm(MARGIN_LEFT),
        Mm(y),
        9.0,
        COLOR_GRAY,
    );
    y -= 5.0 + px_to_mm(CHART_HALF.1);
    place_chart(&layer, &fonts, &charts, "nutrient_correlation", MARGIN_LEFT, y, &mut embedded);

    let mut ty = y + px_to_mm(CHART_HALF.1) - 5.0;
    add_text(&layer, &fonts.bold, "Most frequent drink tags", Mm(150.0), Mm(ty), 11.0, COLOR_SECTION);
    ty -= 6.0;
    for tag in &data.split.top_drink_tags {
        add_text(&layer, &fonts.regular, &format!("{} ({})", tag.tag, tag.count), Mm(150.0), Mm(ty), 9.0, COLOR_BLACK);
        ty -= 4.5;
    }

    // ========================================================================
    // Page 3 - Tags
    // ========================================================================
    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Tags");
    let layer = doc.get_page(page).get_layer(layer_idx);
    let mut y = page_header(&layer, &fonts, "Tags");

    let stats = &data.tags.statistics;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "{} distinct tags, {} uses, {:.1} tags per recipe (median {:.0}, max {:.0})",
            stats.total_unique_tags,
            stats.total_tags,
            stats.tags_per_recipe_mean,
            stats.tags_per_recipe_median,
            stats.tags_per_recipe_max
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 6.0;
    if let Some(best) = &data.best_tags {
        let names = |list: &[TagOfInterest]| {
            list.iter().map(|t| t.metrics.tag.as_str()).collect::<Vec<_>>().join(", ")
        };
        for (label, list) in [
            ("Fastest", &best.best.fastest),
            ("Simplest", &best.best.simplest),
            ("Most popular", &best.best.most_popular),
        ] {
            add_text(&layer, &fonts.regular, &format!("{}: {}", label, names(list.as_slice())), Mm(MARGIN_LEFT), Mm(y), 9.0, COLOR_BLACK);
            y -= 4.5;
        }
    }
    y -= px_to_mm(CHART_WIDE.1);
    place_chart(&layer, &fonts, &charts, "top_tags", MARGIN_LEFT, y, &mut embedded);

    // ========================================================================
    // Page 4 - Ingredients
    // ========================================================================
    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Ingredients");
    let layer = doc.get_page(page).get_layer(layer_idx);
    let mut y = page_header(&layer, &fonts, "Ingredients");

    let summary = &data.ingredients.summary;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "{} distinct ingredients, {} uses",
            summary.unique_ingredients, summary.total_occurrences
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 5.0 + px_to_mm(CHART_WIDE.1);
    place_chart(&layer, &fonts, &charts, "top_ingredients", MARGIN_LEFT, y, &mut embedded);
    if data.neighbours.is_none() {
        add_text(
            &layer,
            &fonts.regular,
            "No ingredient of the top list is present in the co-occurrence matrix",
            Mm(MARGIN_LEFT),
            Mm(y - 8.0),
            9.0,
            COLOR_GRAY,
        );
    } else {
        let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Neighbours");
        let layer = doc.get_page(page).get_layer(layer_idx);
        let y = page_header(&layer, &fonts, "Ingredient associations");
        place_chart(
            &layer,
            &fonts,
            &charts,
            "ingredient_neighbours",
            MARGIN_LEFT,
            y - px_to_mm(CHART_HALF.1),
            &mut embedded,
        );
    }

    // ========================================================================
    // Page 5 - Complexity
    // ========================================================================
    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Complexity");
    let layer = doc.get_page(page).get_layer(layer_idx);
    let mut y = page_header(&layer, &fonts, "Recipe complexity");

    let cx = &data.complexity;
    add_text(
        &layer,
        &fonts.regular,
        &format!(
            "{} of {} recipes kept after trimming above the {:.0}th percentile",
            cx.kept_recipes,
            cx.total_recipes,
            cx.quantile * 100.0
        ),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 3.0 + px_to_mm(CHART_HALF.1);
    let half_width = px_to_mm(CHART_HALF.0) + 5.0;
    place_chart(&layer, &fonts, &charts, "complexity_minutes", MARGIN_LEFT, y, &mut embedded);
    place_chart(&layer, &fonts, &charts, "complexity_correlation", MARGIN_LEFT + half_width, y, &mut embedded);

    let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Complexity 2");
    let layer = doc.get_page(page).get_layer(layer_idx);
    let y = page_header(&layer, &fonts, "Steps and ingredients") - px_to_mm(CHART_HALF.1);
    place_chart(&layer, &fonts, &charts, "complexity_steps", MARGIN_LEFT, y, &mut embedded);
    place_chart(&layer, &fonts, &charts, "complexity_ingredients", MARGIN_LEFT + half_width, y, &mut embedded);

    let pages = if data.neighbours.is_some() { 7 } else { 6 };

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;
    info!("Dashboard report written to {}", output_path);

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.to_string(),
        total_recipes: dataset.recipes.len(),
        pages,
        charts_embedded: embedded,
        message: format!(
            "Dashboard report generated with {} charts over {} recipes",
            embedded,
            dataset.recipes.len()
        ),
        chart_errors,
    })
}

/// Write every dashboard chart as `<name>.png` under `directory`
pub fn export_charts(dataset: &Dataset, config: &AppConfig, directory: &str) -> Result<ExportChartsResponse, String> {
    let data = DashboardData::compute(dataset, config)?;
    let dir = Path::new(directory);
    fs::create_dir_all(dir).map_err(|e| e.to_string())?;

    let mut files = Vec::new();
    let mut chart_errors = Vec::new();
    for chart in render_charts(&data) {
        match chart.png {
            Ok(png) => {
                let path = dir.join(format!("{}.png", chart.name));
                fs::write(&path, png).map_err(|e| e.to_string())?;
                files.push(path.display().to_string());
            }
            Err(e) => chart_errors.push(format!("{}: {}", chart.name, e)),
        }
    }
    info!("Exported {} charts to {}", files.len(), directory);

    Ok(ExportChartsResponse {
        success: chart_errors.is_empty(),
        directory: directory.to_string(),
        files,
        chart_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    fn dataset() -> Dataset {
        let recipes = (1..=30)
            .map(|i| {
                let tags: &[&str] = if i % 5 == 0 { &["beverages", "easy"] } else { &["main-dish", "healthy"] };
                recipe(i, 10 + i, i % 7 + 1, tags, &["salt", "water", if i % 2 == 0 { "egg" } else { "flour" }])
            })
            .collect();
        Dataset::from_recipes(recipes, 1)
    }

    #[test]
    fn test_dashboard_data() {
        let data = DashboardData::compute(&dataset(), &AppConfig::default()).unwrap();
        assert_eq!(data.nutriscore.total_recipes, 30);
        assert_eq!(data.split.summary.drink_recipes, 6);
        assert_eq!(data.ingredients.ingredients[0].ingredient, "salt");
        assert_eq!(data.nutriscore.food_recipes, 24);
        let names: Vec<&str> = render_charts(&data).iter().map(|c| c.name).collect();
        assert!(names.contains(&"nutriscore_grades_food"));
        let (focus, neighbours) = data.neighbours.unwrap();
        assert_eq!(focus, "salt");
        assert!(neighbours.iter().all(|n| n.ingredient != "salt"));
    }

    #[test]
    fn test_px_to_mm() {
        assert!((px_to_mm(120) - 25.4).abs() < 1e-4);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let empty = Dataset::from_recipes(Vec::new(), 1);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");
        assert!(generate_dashboard_report(&empty, &AppConfig::default(), out.to_str().unwrap()).is_err());
    }
}
