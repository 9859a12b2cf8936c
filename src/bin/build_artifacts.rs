//! Precompute the ingredient co-occurrence and Jaccard matrices
//! Usage: cargo run --bin build_artifacts -- [min_count]

use mangetamain::analysis::ingredients::CooccurrenceMatrix;
use mangetamain::config::AppConfig;
use mangetamain::data::loader::load_recipes;
use mangetamain::data::matrix::save_matrix;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let min_count = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => config.data.matrix_min_count,
    };

    println!("Recipes: {}", config.data.recipes_csv.display());
    let recipes = load_recipes(&config.data.recipes_csv)?;
    println!("Loaded {} recipes", recipes.len());

    let co = CooccurrenceMatrix::build(&recipes, min_count);
    println!("Kept {} ingredients seen in at least {} recipes", co.counts().len(), min_count);

    let jaccard = co.jaccard();
    save_matrix(co.counts(), &config.data.co_occurrence_csv)?;
    println!("Wrote {}", config.data.co_occurrence_csv.display());
    save_matrix(&jaccard, &config.data.jaccard_csv)?;
    println!("Wrote {}", config.data.jaccard_csv.display());

    Ok(())
}
