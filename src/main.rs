//! MangeTaMain
//!
//! An MCP server for recipe dataset exploration.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use mangetamain::build_info;
use mangetamain::config::AppConfig;
use mangetamain::data::Dataset;
use mangetamain::mcp::MangetamainService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mangetamain=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();

    let config = AppConfig::load()?;
    eprintln!("Recipes: {}", config.data.recipes_csv.display());

    // Parsing the full CSV takes a while, keep it off the async runtime
    let data_config = config.data.clone();
    let dataset = tokio::task::spawn_blocking(move || Dataset::load(&data_config)).await??;
    eprintln!("Loaded {} recipes", dataset.recipes.len());

    eprintln!("Starting MCP server on stdio...");
    let service = MangetamainService::new(dataset, config);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
