//! Ingredient MCP Tools
//!
//! Frequencies, frequency windows, neighbours in the co-occurrence matrices
//! and typical ingredients per continent.

use serde::Serialize;

use crate::analysis::ingredients::{
    continent_top_ingredients, explode, filter_counts_window, ingredient_counts, summarize, top_conditional_for,
    top_cooccurrences_for, ContinentIngredients, IngredientCount, IngredientSummary, Neighbour,
};
use crate::config::AppConfig;
use crate::data::Dataset;

/// Response for ingredient_counts and ingredient_window
#[derive(Debug, Serialize)]
pub struct IngredientCountsResponse {
    pub summary: IngredientSummary,
    pub min_count: Option<u64>,
    pub max_count: Option<u64>,
    pub matching: usize,
    pub ingredients: Vec<IngredientCount>,
}

/// Response for ingredient_neighbors
#[derive(Debug, Serialize)]
pub struct NeighboursResponse {
    pub focus: String,
    pub mode: String,
    pub min_co: u64,
    pub neighbours: Vec<Neighbour>,
}

/// Response for continent_ingredients
#[derive(Debug, Serialize)]
pub struct ContinentIngredientsResponse {
    pub ubiquity_threshold: f64,
    pub continents: Vec<ContinentIngredients>,
}

pub fn top_ingredients(dataset: &Dataset, limit: usize) -> Result<IngredientCountsResponse, String> {
    let counts = ingredient_counts(&explode(&dataset.recipes));
    let summary = summarize(&counts);
    Ok(IngredientCountsResponse {
        summary,
        min_count: None,
        max_count: None,
        matching: counts.len(),
        ingredients: counts.into_iter().take(limit.clamp(1, 1000)).collect(),
    })
}

pub fn ingredient_window(
    dataset: &Dataset,
    config: &AppConfig,
    min_count: Option<u64>,
    max_count: Option<u64>,
    limit: usize,
) -> Result<IngredientCountsResponse, String> {
    let min_count = min_count.unwrap_or(config.ingredients.min_count);
    let max_count = max_count.or(config.ingredients.max_count);
    if let Some(max) = max_count {
        if max < min_count {
            return Err(format!("max_count ({}) is below min_count ({})", max, min_count));
        }
    }

    let counts = ingredient_counts(&explode(&dataset.recipes));
    let window = filter_counts_window(&counts, min_count, max_count);
    Ok(IngredientCountsResponse {
        summary: summarize(&counts),
        min_count: Some(min_count),
        max_count,
        matching: window.len(),
        ingredients: window.into_iter().take(limit.clamp(1, 1000)).collect(),
    })
}

/// `mode` is "jaccard" or "conditional"
pub fn ingredient_neighbours(
    dataset: &Dataset,
    config: &AppConfig,
    focus: &str,
    mode: &str,
    k: Option<usize>,
    min_co: Option<u64>,
) -> Result<NeighboursResponse, String> {
    let focus = focus.trim().to_lowercase();
    let k = k.unwrap_or(config.ingredients.neighbours_k).clamp(1, 200);
    let min_co = min_co.unwrap_or(config.ingredients.min_co);

    let neighbours = match mode {
        "jaccard" => top_cooccurrences_for(&focus, &dataset.jaccard, &dataset.co_occurrence, k, min_co),
        "conditional" => top_conditional_for(&focus, &dataset.co_occurrence, k, min_co),
        other => return Err(format!("Invalid mode: '{}'. Must be 'jaccard' or 'conditional'", other)),
    }
    .map_err(|e| e.to_string())?;

    Ok(NeighboursResponse {
        focus,
        mode: mode.to_string(),
        min_co,
        neighbours,
    })
}

pub fn continent_ingredients(
    dataset: &Dataset,
    config: &AppConfig,
    top_n: Option<usize>,
    ubiquity_threshold: Option<f64>,
) -> Result<ContinentIngredientsResponse, String> {
    let threshold = ubiquity_threshold.unwrap_or(config.ingredients.ubiquity_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err("ubiquity_threshold must be between 0 and 1".to_string());
    }
    let top_n = top_n.unwrap_or(config.ingredients.continent_top_n).clamp(1, 100);

    Ok(ContinentIngredientsResponse {
        ubiquity_threshold: threshold,
        continents: continent_top_ingredients(&dataset.recipes, &config.ingredients.continents, top_n, threshold),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    fn dataset() -> Dataset {
        Dataset::from_recipes(
            vec![
                recipe(1, 10, 2, &["italian"], &["tomato", "basil", "salt"]),
                recipe(2, 10, 2, &["mexican"], &["tomato", "beans", "salt"]),
                recipe(3, 10, 2, &["mexican"], &["beans", "salt"]),
            ],
            1,
        )
    }

    #[test]
    fn test_ingredient_window_defaults_and_bounds() {
        let config = AppConfig::default();
        let resp = ingredient_window(&dataset(), &config, Some(2), Some(2), 10).unwrap();
        let names: Vec<&str> = resp.ingredients.iter().map(|i| i.ingredient.as_str()).collect();
        assert_eq!(names, vec!["beans", "tomato"]);
        assert!(ingredient_window(&dataset(), &config, Some(5), Some(2), 10).is_err());
    }

    #[test]
    fn test_neighbours_modes() {
        let config = AppConfig::default();
        let jac = ingredient_neighbours(&dataset(), &config, " Tomato ", "jaccard", Some(5), Some(1)).unwrap();
        assert_eq!(jac.focus, "tomato");
        assert!(!jac.neighbours.is_empty());

        let cond = ingredient_neighbours(&dataset(), &config, "tomato", "conditional", Some(5), Some(1)).unwrap();
        assert_eq!(cond.neighbours[0].ingredient, "salt");

        assert!(ingredient_neighbours(&dataset(), &config, "tomato", "cosine", None, None).is_err());
        let unknown = ingredient_neighbours(&dataset(), &config, "saffron", "jaccard", None, None).unwrap_err();
        assert!(unknown.contains("saffron"));
    }

    #[test]
    fn test_continent_threshold_validated() {
        assert!(continent_ingredients(&dataset(), &AppConfig::default(), None, Some(1.5)).is_err());
        let resp = continent_ingredients(&dataset(), &AppConfig::default(), None, Some(1.0)).unwrap();
        assert_eq!(resp.continents[0].continent, "North America");
    }
}
