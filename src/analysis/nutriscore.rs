//! Nutri-Score grading
//!
//! Each nutrient earns points from its threshold table; protein points are
//! subtracted, all others added, and the total is looked up in the grade
//! bands. Totals outside every band fall back to `E`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::stats::CorrelationMatrix;
use crate::config::{GradeBand, Limits, NutriScoreConfig};
use crate::models::{Grade, Nutrient, NutrientValues, Nutrition, Recipe};

/// Index of the first threshold >= value, or the table length if none
pub fn points(value: f64, thresholds: &[f64]) -> u32 {
    thresholds
        .iter()
        .position(|t| value <= *t)
        .unwrap_or(thresholds.len()) as u32
}

#[derive(Debug, Clone)]
pub struct NutriScorer {
    thresholds: BTreeMap<Nutrient, Vec<f64>>,
    bands: Vec<GradeBand>,
}

impl NutriScorer {
    pub fn new(config: &NutriScoreConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            bands: config.grades.clone(),
        }
    }

    /// Signed point sum; nutrients without a table or absent from `values` count 0
    pub fn total_points(&self, values: &NutrientValues) -> i32 {
        self.thresholds
            .iter()
            .filter_map(|(nutrient, cuts)| {
                values.get(nutrient).map(|v| {
                    let p = points(*v, cuts) as i32;
                    if nutrient.is_favorable() {
                        -p
                    } else {
                        p
                    }
                })
            })
            .sum()
    }

    pub fn grade_for_points(&self, total: i32) -> Grade {
        self.bands
            .iter()
            .find(|b| b.low <= total && total <= b.high)
            .map(|b| b.grade)
            .unwrap_or(Grade::E)
    }

    pub fn grade(&self, values: &NutrientValues) -> Grade {
        self.grade_for_points(self.total_points(values))
    }

    pub fn grade_nutrition(&self, nutrition: &Nutrition) -> (i32, Grade) {
        let total = self.total_points(&nutrition.to_values());
        (total, self.grade_for_points(total))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredRecipe<'a> {
    pub recipe: &'a Recipe,
    pub total_points: i32,
    pub grade: Grade,
}

pub fn score_recipes<'a, I>(recipes: I, scorer: &NutriScorer) -> Vec<ScoredRecipe<'a>>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    recipes
        .into_iter()
        .map(|recipe| {
            let (total_points, grade) = scorer.grade_nutrition(&recipe.nutrition);
            ScoredRecipe {
                recipe,
                total_points,
                grade,
            }
        })
        .collect()
}

pub fn within_limits(nutrition: &Nutrition, limits: &BTreeMap<Nutrient, Limits>) -> bool {
    limits.iter().all(|(nutrient, l)| {
        let v = nutrition.get(*nutrient);
        l.min <= v && v <= l.max
    })
}

/// Drop recipes with implausible nutrition values (inclusive window)
pub fn filter_by_limits<'a, I>(recipes: I, limits: &BTreeMap<Nutrient, Limits>) -> Vec<&'a Recipe>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    recipes
        .into_iter()
        .filter(|r| within_limits(&r.nutrition, limits))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeShare {
    pub grade: Grade,
    pub count: usize,
    pub percent: f64,
}

/// Count and share per grade, all five grades present
pub fn grade_distribution(scored: &[ScoredRecipe<'_>]) -> Vec<GradeShare> {
    let mut counts = [0usize; 5];
    for s in scored {
        counts[s.grade.index()] += 1;
    }
    let total = scored.len();
    Grade::ALL
        .iter()
        .map(|g| {
            let count = counts[g.index()];
            GradeShare {
                grade: *g,
                count,
                percent: if total == 0 { 0.0 } else { count as f64 / total as f64 * 100.0 },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthComparison {
    pub keyword: String,
    pub total_recipes: usize,
    pub health_recipes: usize,
    pub non_health_recipes: usize,
    pub all: Vec<GradeShare>,
    pub health: Vec<GradeShare>,
}

/// Grade shares of every recipe vs. the ones carrying a `keyword` tag
pub fn compare_health(scored: &[ScoredRecipe<'_>], keyword: &str) -> HealthComparison {
    let health: Vec<ScoredRecipe<'_>> = scored
        .iter()
        .filter(|s| s.recipe.has_tag_containing(keyword))
        .copied()
        .collect();

    HealthComparison {
        keyword: keyword.to_string(),
        total_recipes: scored.len(),
        health_recipes: health.len(),
        non_health_recipes: scored.len() - health.len(),
        all: grade_distribution(scored),
        health: grade_distribution(&health),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LowGradeRow {
    pub grade: Grade,
    pub recipes: usize,
    pub health_tagged: usize,
    pub health_share_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowScoreReport {
    pub keyword: String,
    pub rows: Vec<LowGradeRow>,
    pub total_low: usize,
    pub health_tagged_low: usize,
    /// A few recipe ids graded D/E despite a health tag
    pub examples: Vec<i64>,
}

/// How many D/E graded recipes still carry a health tag
pub fn low_scores_with_health_label(
    scored: &[ScoredRecipe<'_>],
    keyword: &str,
    max_examples: usize,
) -> LowScoreReport {
    let mut rows = Vec::new();
    let mut examples = Vec::new();

    for grade in [Grade::D, Grade::E] {
        let in_grade: Vec<&ScoredRecipe<'_>> = scored.iter().filter(|s| s.grade == grade).collect();
        let tagged: Vec<&ScoredRecipe<'_>> = in_grade
            .iter()
            .copied()
            .filter(|s| s.recipe.has_tag_containing(keyword))
            .collect();

        for s in &tagged {
            if examples.len() < max_examples {
                examples.push(s.recipe.id);
            }
        }

        rows.push(LowGradeRow {
            grade,
            recipes: in_grade.len(),
            health_tagged: tagged.len(),
            health_share_percent: if in_grade.is_empty() {
                0.0
            } else {
                tagged.len() as f64 / in_grade.len() as f64 * 100.0
            },
        });
    }

    LowScoreReport {
        keyword: keyword.to_string(),
        total_low: rows.iter().map(|r| r.recipes).sum(),
        health_tagged_low: rows.iter().map(|r| r.health_tagged).sum(),
        rows,
        examples,
    }
}

/// Pearson correlation between the seven nutrients
pub fn nutrient_correlation(recipes: &[&Recipe]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = Nutrient::ALL
        .iter()
        .map(|n| recipes.iter().map(|r| r.nutrition.get(*n)).collect())
        .collect();
    let labels = Nutrient::ALL.iter().map(|n| n.as_str().to_string()).collect();
    CorrelationMatrix::compute(labels, &columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::fixtures::recipe;

    fn scorer() -> NutriScorer {
        NutriScorer::new(&AppConfig::default().nutriscore)
    }

    fn values(pairs: &[(Nutrient, f64)]) -> NutrientValues {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_points() {
        let cuts = [10.0, 20.0, 30.0];
        assert_eq!(points(0.0, &cuts), 0);
        assert_eq!(points(10.0, &cuts), 0);
        assert_eq!(points(10.5, &cuts), 1);
        assert_eq!(points(30.0, &cuts), 2);
        assert_eq!(points(31.0, &cuts), 3);
        assert_eq!(points(5.0, &[]), 0);
    }

    #[test]
    fn test_empty_mapping_grades_a() {
        let s = scorer();
        assert_eq!(s.total_points(&NutrientValues::new()), 0);
        assert_eq!(s.grade(&NutrientValues::new()), Grade::A);
    }

    #[test]
    fn test_low_adverse_nutrients_grade_a() {
        let s = scorer();
        let config = AppConfig::default().nutriscore;
        let mut v: NutrientValues = config
            .thresholds
            .iter()
            .filter(|(n, _)| !n.is_favorable())
            .map(|(n, cuts)| (*n, cuts[0]))
            .collect();
        // Protein at its first threshold earns no points
        v.insert(Nutrient::Protein, config.thresholds[&Nutrient::Protein][0]);
        assert_eq!(s.total_points(&v), 0);
        assert_eq!(s.grade(&v), Grade::A);
    }

    #[test]
    fn test_band_edges_are_closed() {
        let s = scorer();
        assert_eq!(s.grade_for_points(0), Grade::A);
        assert_eq!(s.grade_for_points(2), Grade::A);
        assert_eq!(s.grade_for_points(3), Grade::B);
        assert_eq!(s.grade_for_points(10), Grade::B);
        assert_eq!(s.grade_for_points(11), Grade::C);
        assert_eq!(s.grade_for_points(18), Grade::C);
        assert_eq!(s.grade_for_points(19), Grade::D);
        assert_eq!(s.grade_for_points(40), Grade::D);
        assert_eq!(s.grade_for_points(41), Grade::E);
        assert_eq!(s.grade_for_points(100), Grade::E);
    }

    #[test]
    fn test_out_of_band_totals_fall_back_to_e() {
        let s = scorer();
        assert_eq!(s.grade_for_points(101), Grade::E);
        assert_eq!(s.grade_for_points(-1), Grade::E);

        // High protein alone drives the total negative
        let v = values(&[(Nutrient::Protein, 100.0)]);
        assert_eq!(s.total_points(&v), -5);
        assert_eq!(s.grade(&v), Grade::E);
    }

    #[test]
    fn test_protein_offsets_adverse_points() {
        let s = scorer();
        // fat 3 points, sugar 1 point, protein -1 point
        let v = values(&[
            (Nutrient::Fat, 10.0),
            (Nutrient::Sugar, 9.0),
            (Nutrient::Protein, 10.0),
        ]);
        assert_eq!(s.total_points(&v), 3 + 1 - 1);
        assert_eq!(s.grade(&v), Grade::B);
    }

    #[test]
    fn test_filter_by_limits_is_inclusive() {
        let mut ok = recipe(1, 10, 1, &[], &[]);
        ok.nutrition.calories = 3000.0;
        let mut too_rich = recipe(2, 10, 1, &[], &[]);
        too_rich.nutrition.calories = 3000.5;
        let recipes = vec![ok, too_rich];
        let kept = filter_by_limits(&recipes, &AppConfig::default().nutrition_limits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn test_distribution_and_health_comparison() {
        let s = scorer();
        let mut healthy = recipe(1, 10, 1, &["healthy"], &[]);
        healthy.nutrition.calories = 50.0;
        let mut rich = recipe(2, 10, 1, &["desserts"], &[]);
        rich.nutrition = Nutrition::from_slice(&[900.0, 60.0, 80.0, 50.0, 1.0, 70.0, 40.0]).unwrap();
        let mut rich_health = rich.clone();
        rich_health.id = 3;
        rich_health.tags = vec!["health-conscious".into()];

        let recipes = vec![healthy, rich, rich_health];
        let scored = score_recipes(&recipes, &s);
        assert_eq!(scored[0].grade, Grade::A);
        assert_eq!(scored[1].grade, Grade::E);

        let dist = grade_distribution(&scored);
        assert_eq!(dist.len(), 5);
        let pct: f64 = dist.iter().map(|d| d.percent).sum();
        assert!((pct - 100.0).abs() < 1e-9);

        let cmp = compare_health(&scored, "health");
        assert_eq!(cmp.health_recipes, 2);
        assert_eq!(cmp.non_health_recipes, 1);
        assert!((cmp.health[Grade::E.index()].percent - 50.0).abs() < 1e-9);

        let low = low_scores_with_health_label(&scored, "health", 10);
        assert_eq!(low.total_low, 2);
        assert_eq!(low.health_tagged_low, 1);
        assert_eq!(low.examples, vec![3]);
    }

    #[test]
    fn test_nutrient_correlation_shape() {
        let mut a = recipe(1, 1, 1, &[], &[]);
        a.nutrition = Nutrition::from_slice(&[100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut b = recipe(2, 1, 1, &[], &[]);
        b.nutrition = Nutrition::from_slice(&[200.0, 2.0, 1.0, 6.0, 8.0, 10.0, 12.0]).unwrap();
        let m = nutrient_correlation(&[&a, &b]);
        assert_eq!(m.labels.len(), 7);
        assert!((m.get("calories", "fat").unwrap() - 1.0).abs() < 1e-9);
        assert!((m.get("calories", "sugar").unwrap() + 1.0).abs() < 1e-9);
    }
}
