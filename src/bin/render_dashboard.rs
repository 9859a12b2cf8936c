//! Render the PDF dashboard without starting the server
//! Usage: cargo run --bin render_dashboard -- [output.pdf]

use mangetamain::config::AppConfig;
use mangetamain::data::Dataset;
use mangetamain::tools::reports::generate_dashboard_report;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.data.reports_dir.join("dashboard.pdf").display().to_string());

    let dataset = Dataset::load(&config.data)?;
    println!("Loaded {} recipes", dataset.recipes.len());

    let report = generate_dashboard_report(&dataset, &config, &output)?;
    println!("{}", report.message);
    for err in &report.chart_errors {
        println!("  chart skipped: {}", err);
    }

    Ok(())
}
