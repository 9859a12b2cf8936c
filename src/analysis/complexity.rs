//! Recipe complexity: preparation time, steps, ingredient count

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::stats::{histogram, quantile, CorrelationMatrix, Describe, HistogramBin};
use crate::models::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Minutes,
    NSteps,
    NIngredients,
    LogMinutes,
}

impl Feature {
    /// Features trimmed during preprocessing, in trimming order
    pub const RAW: [Feature; 3] = [Feature::Minutes, Feature::NSteps, Feature::NIngredients];
    /// Features compared against each other
    pub const RELATED: [Feature; 3] = [Feature::LogMinutes, Feature::NSteps, Feature::NIngredients];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Minutes => "minutes",
            Feature::NSteps => "n_steps",
            Feature::NIngredients => "n_ingredients",
            Feature::LogMinutes => "log_minutes",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "minutes" => Ok(Feature::Minutes),
            "n_steps" => Ok(Feature::NSteps),
            "n_ingredients" => Ok(Feature::NIngredients),
            "log_minutes" => Ok(Feature::LogMinutes),
            other => Err(format!(
                "Invalid feature: '{}'. Must be 'minutes', 'n_steps', 'n_ingredients' or 'log_minutes'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityRow {
    pub id: i64,
    pub minutes: i64,
    pub n_steps: i64,
    pub n_ingredients: i64,
    pub log_minutes: f64,
}

impl ComplexityRow {
    fn from_recipe(r: &Recipe) -> Self {
        Self {
            id: r.id,
            minutes: r.minutes,
            n_steps: r.n_steps,
            n_ingredients: r.n_ingredients,
            log_minutes: (r.minutes as f64).ln_1p(),
        }
    }

    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Minutes => self.minutes as f64,
            Feature::NSteps => self.n_steps as f64,
            Feature::NIngredients => self.n_ingredients as f64,
            Feature::LogMinutes => self.log_minutes,
        }
    }
}

/// Keep recipes with positive time, steps and ingredients, then trim each
/// raw feature above its `q` quantile, one feature after the other.
pub fn preprocess<'a, I>(recipes: I, q: f64) -> Vec<ComplexityRow>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut rows: Vec<ComplexityRow> = recipes
        .into_iter()
        .filter(|r| r.minutes > 0 && r.n_steps > 0 && r.n_ingredients > 0)
        .map(ComplexityRow::from_recipe)
        .collect();

    for feature in Feature::RAW {
        let values: Vec<f64> = rows.iter().map(|r| r.value(feature)).collect();
        let cut = quantile(&values, q);
        rows.retain(|r| r.value(feature) <= cut);
    }

    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct UnivariateSummary {
    pub feature: Feature,
    /// `minutes` is summarised on its log scale
    pub plotted_feature: Feature,
    pub describe: Option<Describe>,
    pub histogram: Vec<HistogramBin>,
}

pub fn univariate(rows: &[ComplexityRow], feature: Feature, bins: usize) -> UnivariateSummary {
    let plotted_feature = match feature {
        Feature::Minutes => Feature::LogMinutes,
        other => other,
    };
    let values: Vec<f64> = rows.iter().map(|r| r.value(plotted_feature)).collect();
    UnivariateSummary {
        feature,
        plotted_feature,
        describe: Describe::of(&values),
        histogram: histogram(&values, bins),
    }
}

pub fn feature_correlation(rows: &[ComplexityRow]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = Feature::RELATED
        .iter()
        .map(|f| rows.iter().map(|r| r.value(*f)).collect())
        .collect();
    let labels = Feature::RELATED.iter().map(|f| f.as_str().to_string()).collect();
    CorrelationMatrix::compute(labels, &columns)
}

#[derive(Debug, Clone, Serialize)]
pub struct KindSummary {
    pub kind: &'static str,
    pub feature: Feature,
    pub describe: Option<Describe>,
}

/// Per-feature statistics split into food and drink
pub fn summary_by_kind(rows: &[ComplexityRow], drink_ids: &HashSet<i64>) -> Vec<KindSummary> {
    let (drink, food): (Vec<&ComplexityRow>, Vec<&ComplexityRow>) =
        rows.iter().partition(|r| drink_ids.contains(&r.id));

    let mut out = Vec::new();
    for (kind, subset) in [("food", &food), ("drink", &drink)] {
        for feature in Feature::RELATED {
            let values: Vec<f64> = subset.iter().map(|r| r.value(feature)).collect();
            out.push(KindSummary {
                kind,
                feature,
                describe: Describe::of(&values),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    fn dataset() -> Vec<Recipe> {
        let mut recipes: Vec<Recipe> = (1..=100)
            .map(|i| recipe(i, i * 2, (i % 10) + 1, &[], &["a", "b", "c"]))
            .collect();
        recipes.push(recipe(101, 0, 3, &[], &["a"]));
        recipes.push(recipe(102, 30, 0, &[], &["a"]));
        recipes.push(recipe(103, 100_000, 4, &[], &["a", "b"]));
        recipes
    }

    #[test]
    fn test_preprocess_drops_non_positive_rows() {
        let rows = preprocess(&dataset(), 0.99);
        assert!(rows.iter().all(|r| r.minutes > 0 && r.n_steps > 0 && r.n_ingredients > 0));
        assert!(!rows.iter().any(|r| r.id == 101 || r.id == 102));
    }

    #[test]
    fn test_preprocess_trims_above_quantile() {
        let recipes = dataset();
        let rows = preprocess(&recipes, 0.99);
        assert!(!rows.iter().any(|r| r.id == 103));

        // No kept row exceeds the minutes cut taken on the positive rows
        let positive: Vec<f64> = recipes
            .iter()
            .filter(|r| r.minutes > 0 && r.n_steps > 0 && r.n_ingredients > 0)
            .map(|r| r.minutes as f64)
            .collect();
        let cut = quantile(&positive, 0.99);
        assert!(rows.iter().all(|r| (r.minutes as f64) <= cut));
    }

    #[test]
    fn test_log_minutes() {
        let rows = preprocess(&[recipe(1, 9, 1, &[], &["x"])], 1.0);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].log_minutes - 10f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_univariate_minutes_uses_log_scale() {
        let rows = preprocess(&dataset(), 0.99);
        let summary = univariate(&rows, Feature::Minutes, 10);
        assert_eq!(summary.plotted_feature, Feature::LogMinutes);
        let d = summary.describe.unwrap();
        assert_eq!(d.count, rows.len());
        assert!(d.max < 10.0);
        assert_eq!(summary.histogram.iter().map(|b| b.count).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_feature_correlation_labels() {
        let rows = preprocess(&dataset(), 0.99);
        let m = feature_correlation(&rows);
        assert_eq!(m.labels, vec!["log_minutes", "n_steps", "n_ingredients"]);
        assert_eq!(m.values[1][1], 1.0);
    }

    #[test]
    fn test_summary_by_kind() {
        let rows = preprocess(&dataset(), 0.99);
        let drinks = HashSet::from([1, 2, 3]);
        let summary = summary_by_kind(&rows, &drinks);
        assert_eq!(summary.len(), 6);
        let drink_steps = summary
            .iter()
            .find(|s| s.kind == "drink" && s.feature == Feature::NSteps)
            .unwrap();
        assert_eq!(drink_steps.describe.as_ref().unwrap().count, 3);
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!("n_steps".parse::<Feature>(), Ok(Feature::NSteps));
        assert!("steps".parse::<Feature>().is_err());
    }
}
