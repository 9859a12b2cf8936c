//! Nutri-Score MCP Tools
//!
//! Grade ad-hoc nutrition values and summarise grades over the dataset.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::analysis::classifier::DrinkClassifier;
use crate::analysis::nutriscore::{
    compare_health, filter_by_limits, grade_distribution, low_scores_with_health_label,
    nutrient_correlation, points, score_recipes, GradeShare, HealthComparison, LowScoreReport,
    NutriScorer,
};
use crate::analysis::stats::CorrelationMatrix;
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::models::{Grade, Nutrient, NutrientValues, Recipe};

/// Points contributed by one nutrient
#[derive(Debug, Serialize)]
pub struct NutrientPoints {
    pub nutrient: Nutrient,
    pub value: f64,
    pub points: i32,
}

/// Response for score_nutrition
#[derive(Debug, Serialize)]
pub struct ScoreNutritionResponse {
    pub total_points: i32,
    pub grade: Grade,
    pub breakdown: Vec<NutrientPoints>,
    /// Names that are not one of the seven nutrients
    pub ignored: Vec<String>,
}

/// Reference to a recipe in list results
#[derive(Debug, Serialize)]
pub struct RecipeRef {
    pub id: i64,
    pub name: String,
}

impl From<&Recipe> for RecipeRef {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
        }
    }
}

/// Response for nutriscore_overview
#[derive(Debug, Serialize)]
pub struct NutriScoreOverviewResponse {
    pub total_recipes: usize,
    pub within_limits: usize,
    pub excluded_by_limits: usize,
    pub distribution: Vec<GradeShare>,
    pub health: HealthComparison,
    pub food_recipes: usize,
    pub drink_recipes: usize,
    pub food_within_limits: usize,
    /// Same comparison with drink recipes removed
    pub food_health: HealthComparison,
    /// Computed over food recipes only
    pub low_scores: LowScoreReport,
    pub low_score_examples: Vec<RecipeRef>,
    pub nutrient_correlation: CorrelationMatrix,
}

/// Grade a nutrient name -> value map
pub fn score_nutrition(config: &AppConfig, values: &BTreeMap<String, f64>) -> Result<ScoreNutritionResponse, String> {
    let mut parsed = NutrientValues::new();
    let mut ignored = Vec::new();
    for (name, value) in values {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number", name));
        }
        match name.parse::<Nutrient>() {
            Ok(nutrient) => {
                parsed.insert(nutrient, *value);
            }
            Err(_) => ignored.push(name.clone()),
        }
    }

    let breakdown = parsed
        .iter()
        .map(|(nutrient, value)| {
            let p = config
                .nutriscore
                .thresholds
                .get(nutrient)
                .map(|cuts| points(*value, cuts) as i32)
                .unwrap_or(0);
            NutrientPoints {
                nutrient: *nutrient,
                value: *value,
                points: if nutrient.is_favorable() { -p } else { p },
            }
        })
        .collect();

    let scorer = NutriScorer::new(&config.nutriscore);
    let total_points = scorer.total_points(&parsed);
    debug!("Scored ad-hoc nutrition: {} points", total_points);

    Ok(ScoreNutritionResponse {
        total_points,
        grade: scorer.grade_for_points(total_points),
        breakdown,
        ignored,
    })
}

/// Grade every recipe inside the nutrition limits, then again with drinks
/// removed. Drinks follow a different Nutri-Score scheme, so the low-score
/// analysis only looks at food.
pub fn nutriscore_overview(
    dataset: &Dataset,
    config: &AppConfig,
    low_examples: usize,
) -> Result<NutriScoreOverviewResponse, String> {
    let kept = filter_by_limits(&dataset.recipes, &config.nutrition_limits);
    if kept.is_empty() {
        return Err("No recipe falls inside the configured nutrition limits".to_string());
    }

    let classifier = DrinkClassifier::new(&config.classifier.drink_keywords)
        .map_err(|e| format!("Invalid drink keywords: {}", e))?;
    let partition = classifier.partition(&dataset.recipes);
    let food_kept = filter_by_limits(partition.food.iter().copied(), &config.nutrition_limits);

    let scorer = NutriScorer::new(&config.nutriscore);
    let scored = score_recipes(kept.iter().copied(), &scorer);
    let food_scored = score_recipes(food_kept.iter().copied(), &scorer);
    let keyword = config.tags.health_keyword.as_str();
    let low_scores = low_scores_with_health_label(&food_scored, keyword, low_examples.min(100));
    debug!(
        "Graded {} recipes, {} of them food",
        scored.len(),
        food_scored.len()
    );

    let by_id: BTreeMap<i64, &Recipe> = food_kept.iter().map(|r| (r.id, *r)).collect();
    // Correlations use every recipe, before the plausibility limits
    let all: Vec<&Recipe> = dataset.recipes.iter().collect();
    let low_score_examples = low_scores
        .examples
        .iter()
        .filter_map(|id| by_id.get(id).map(|r| RecipeRef::from(*r)))
        .collect();

    Ok(NutriScoreOverviewResponse {
        total_recipes: dataset.recipes.len(),
        within_limits: kept.len(),
        excluded_by_limits: dataset.recipes.len() - kept.len(),
        distribution: grade_distribution(&scored),
        health: compare_health(&scored, keyword),
        food_recipes: partition.food.len(),
        drink_recipes: partition.drink.len(),
        food_within_limits: food_kept.len(),
        food_health: compare_health(&food_scored, keyword),
        low_scores,
        low_score_examples,
        nutrient_correlation: nutrient_correlation(&all),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;
    use crate::models::Nutrition;

    #[test]
    fn test_score_nutrition_breakdown() {
        let config = AppConfig::default();
        let values = BTreeMap::from([
            ("fat".to_string(), 10.0),
            ("sugar".to_string(), 9.0),
            ("protein".to_string(), 10.0),
            ("fiber".to_string(), 3.0),
        ]);
        let resp = score_nutrition(&config, &values).unwrap();
        assert_eq!(resp.total_points, 3);
        assert_eq!(resp.grade, Grade::B);
        assert_eq!(resp.ignored, vec!["fiber"]);
        let protein = resp.breakdown.iter().find(|p| p.nutrient == Nutrient::Protein).unwrap();
        assert_eq!(protein.points, -1);
    }

    #[test]
    fn test_score_nutrition_rejects_nan() {
        let values = BTreeMap::from([("fat".to_string(), f64::NAN)]);
        assert!(score_nutrition(&AppConfig::default(), &values).is_err());
    }

    #[test]
    fn test_overview_applies_limits() {
        let mut healthy = recipe(1, 10, 2, &["healthy"], &["kale"]);
        healthy.nutrition = Nutrition::from_slice(&[100.0, 1.0, 1.0, 1.0, 10.0, 1.0, 1.0]).unwrap();
        let mut heavy = recipe(2, 10, 2, &["healthy-2"], &["butter"]);
        heavy.nutrition = Nutrition::from_slice(&[900.0, 40.0, 50.0, 50.0, 0.0, 60.0, 40.0]).unwrap();
        let mut absurd = recipe(3, 10, 2, &[], &["salt"]);
        absurd.nutrition = Nutrition::from_slice(&[10_000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();

        let dataset = Dataset::from_recipes(vec![healthy, heavy, absurd], 1);
        let resp = nutriscore_overview(&dataset, &AppConfig::default(), 5).unwrap();
        assert_eq!(resp.total_recipes, 3);
        assert_eq!(resp.within_limits, 2);
        assert_eq!(resp.excluded_by_limits, 1);
        assert_eq!(resp.health.health_recipes, 2);
        assert_eq!(resp.low_scores.health_tagged_low, 1);
        assert_eq!(resp.low_score_examples[0].id, 2);
    }

    #[test]
    fn test_low_scores_ignore_drinks() {
        let mut shake = recipe(7, 5, 2, &["beverages", "healthy"], &["milk", "sugar"]);
        shake.nutrition = Nutrition::from_slice(&[900.0, 40.0, 50.0, 50.0, 0.0, 60.0, 40.0]).unwrap();
        let mut salad = recipe(8, 10, 2, &["salads"], &["lettuce"]);
        salad.nutrition = Nutrition::from_slice(&[100.0, 1.0, 1.0, 1.0, 10.0, 1.0, 1.0]).unwrap();

        let dataset = Dataset::from_recipes(vec![shake, salad], 1);
        let resp = nutriscore_overview(&dataset, &AppConfig::default(), 5).unwrap();

        assert_eq!(resp.drink_recipes, 1);
        assert_eq!(resp.food_recipes, 1);
        assert_eq!(resp.within_limits, 2);
        assert_eq!(resp.food_within_limits, 1);
        // the shake still counts in the all-recipes comparison
        assert_eq!(resp.health.health_recipes, 1);
        assert_eq!(resp.food_health.health_recipes, 0);
        assert_eq!(resp.food_health.total_recipes, 1);
        assert_eq!(resp.low_scores.health_tagged_low, 0);
        assert!(resp.low_scores.examples.is_empty());
        assert!(resp.low_score_examples.is_empty());
    }

    #[test]
    fn test_correlation_uses_recipes_outside_limits() {
        let rows = [
            [100.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0],
            [200.0, 2.0, 1.0, 2.0, 2.0, 2.0, 2.0],
            [300.0, 3.0, 4.0, 3.0, 3.0, 3.0, 3.0],
            // calories above the default limit
            [9000.0, 1.0, 1.0, 4.0, 4.0, 4.0, 4.0],
        ];
        let recipes: Vec<Recipe> = rows
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let mut r = recipe(i as i64 + 1, 10, 2, &[], &["salt"]);
                r.nutrition = Nutrition::from_slice(values).unwrap();
                r
            })
            .collect();
        let all: Vec<&Recipe> = recipes.iter().collect();
        let expected = nutrient_correlation(&all).get("calories", "fat").unwrap();

        let dataset = Dataset::from_recipes(recipes.clone(), 1);
        let resp = nutriscore_overview(&dataset, &AppConfig::default(), 5).unwrap();
        assert_eq!(resp.within_limits, 3);
        let got = resp.nutrient_correlation.get("calories", "fat").unwrap();
        assert!((got - expected).abs() < 1e-12);
        // inside the limits calories and fat are perfectly correlated
        assert!(got < 0.99);
    }
}
