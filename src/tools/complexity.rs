//! Complexity MCP Tools

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::analysis::classifier::DrinkClassifier;
use crate::analysis::complexity::{
    feature_correlation, preprocess, summary_by_kind, univariate, Feature, KindSummary, UnivariateSummary,
};
use crate::analysis::ingredients::assign_continent;
use crate::analysis::stats::{CorrelationMatrix, Describe};
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::models::Recipe;

/// Complexity figures for one continent
#[derive(Debug, Serialize)]
pub struct ContinentComplexity {
    pub continent: String,
    pub recipes: usize,
    pub log_minutes: Option<Describe>,
    pub n_steps: Option<Describe>,
    pub n_ingredients: Option<Describe>,
}

/// Response for complexity_summary
#[derive(Debug, Serialize)]
pub struct ComplexitySummaryResponse {
    pub total_recipes: usize,
    pub kept_recipes: usize,
    pub quantile: f64,
    pub features: Vec<UnivariateSummary>,
    pub correlation: CorrelationMatrix,
    pub by_kind: Vec<KindSummary>,
    pub by_continent: Vec<ContinentComplexity>,
}

pub fn complexity_summary(dataset: &Dataset, config: &AppConfig) -> Result<ComplexitySummaryResponse, String> {
    let q = config.complexity.quantile;
    let rows = preprocess(&dataset.recipes, q);
    if rows.is_empty() {
        return Err("No recipe with positive minutes, steps and ingredients".to_string());
    }

    let classifier = DrinkClassifier::new(&config.classifier.drink_keywords)
        .map_err(|e| format!("Invalid drink keywords: {}", e))?;
    let drink_ids = classifier.drink_ids(&dataset.recipes);

    let features = Feature::RAW
        .iter()
        .map(|f| univariate(&rows, *f, config.complexity.histogram_bins))
        .collect();

    let kept: HashSet<i64> = rows.iter().map(|r| r.id).collect();
    let mut groups: BTreeMap<&str, Vec<&Recipe>> = Default::default();
    for recipe in dataset.recipes.iter().filter(|r| kept.contains(&r.id)) {
        if let Some(continent) = assign_continent(recipe, &config.ingredients.continents) {
            groups.entry(continent).or_default().push(recipe);
        }
    }
    let mut by_continent: Vec<ContinentComplexity> = groups
        .into_iter()
        .map(|(continent, recipes)| {
            let column = |f: fn(&Recipe) -> f64| {
                Describe::of(&recipes.iter().map(|r| f(r)).collect::<Vec<_>>())
            };
            ContinentComplexity {
                continent: continent.to_string(),
                recipes: recipes.len(),
                log_minutes: column(|r| (r.minutes as f64).ln_1p()),
                n_steps: column(|r| r.n_steps as f64),
                n_ingredients: column(|r| r.n_ingredients as f64),
            }
        })
        .collect();
    by_continent.sort_by(|a, b| b.recipes.cmp(&a.recipes));

    Ok(ComplexitySummaryResponse {
        total_recipes: dataset.recipes.len(),
        kept_recipes: rows.len(),
        quantile: q,
        features,
        correlation: feature_correlation(&rows),
        by_kind: summary_by_kind(&rows, &drink_ids),
        by_continent,
    })
}

/// Response for feature_distribution
#[derive(Debug, Serialize)]
pub struct FeatureDistributionResponse {
    pub kept_recipes: usize,
    #[serde(flatten)]
    pub summary: UnivariateSummary,
}

/// Describe and histogram of one feature after trimming
pub fn feature_distribution(
    dataset: &Dataset,
    config: &AppConfig,
    feature: &str,
    bins: Option<usize>,
) -> Result<FeatureDistributionResponse, String> {
    let feature: Feature = feature.parse()?;
    let rows = preprocess(&dataset.recipes, config.complexity.quantile);
    if rows.is_empty() {
        return Err("No recipe with positive minutes, steps and ingredients".to_string());
    }
    let bins = bins.unwrap_or(config.complexity.histogram_bins).clamp(1, 200);

    Ok(FeatureDistributionResponse {
        kept_recipes: rows.len(),
        summary: univariate(&rows, feature, bins),
    })
}
