//! Tag MCP Tools

use serde::Serialize;

use crate::analysis::stats::{histogram, HistogramBin};
use crate::analysis::tags::{best_tags, general_statistics, tag_metrics, tags_of_interest, BestTags, TagMetrics, TagStatistics};
use crate::config::AppConfig;
use crate::data::Dataset;

/// Response for tag_statistics
#[derive(Debug, Serialize)]
pub struct TagStatisticsResponse {
    #[serde(flatten)]
    pub statistics: TagStatistics,
    pub tags_per_recipe_histogram: Vec<HistogramBin>,
}

/// Response for tag_metrics
#[derive(Debug, Serialize)]
pub struct TagMetricsResponse {
    pub min_recipes: usize,
    pub total: usize,
    pub tags: Vec<TagMetrics>,
}

/// Response for best_tags
#[derive(Debug, Serialize)]
pub struct BestTagsResponse {
    pub tags_considered: usize,
    #[serde(flatten)]
    pub best: BestTags,
}

pub fn tag_statistics(dataset: &Dataset, config: &AppConfig, top_n: Option<usize>) -> Result<TagStatisticsResponse, String> {
    if dataset.recipes.is_empty() {
        return Err("Dataset is empty".to_string());
    }
    let top_n = top_n.unwrap_or(config.tags.top_n).clamp(1, 500);
    let per_recipe: Vec<f64> = dataset.recipes.iter().map(|r| r.tags.len() as f64).collect();

    Ok(TagStatisticsResponse {
        statistics: general_statistics(&dataset.recipes, top_n),
        tags_per_recipe_histogram: histogram(&per_recipe, config.complexity.histogram_bins),
    })
}

pub fn list_tag_metrics(
    dataset: &Dataset,
    config: &AppConfig,
    min_recipes: Option<usize>,
    limit: usize,
) -> Result<TagMetricsResponse, String> {
    let min_recipes = min_recipes.unwrap_or(config.tags.min_recipes_per_tag);
    let mut tags = tag_metrics(&dataset.recipes, min_recipes);
    let total = tags.len();
    tags.truncate(limit.clamp(1, 1000));
    Ok(TagMetricsResponse { min_recipes, total, tags })
}

pub fn find_best_tags(
    dataset: &Dataset,
    config: &AppConfig,
    min_recipes: Option<usize>,
    n: usize,
) -> Result<BestTagsResponse, String> {
    let metrics = tag_metrics(&dataset.recipes, min_recipes.unwrap_or(config.tags.min_recipes_per_tag));
    let interest = tags_of_interest(&metrics, &config.tags.categories);
    if interest.is_empty() {
        return Err("No configured tag of interest has enough recipes".to_string());
    }
    Ok(BestTagsResponse {
        tags_considered: interest.len(),
        best: best_tags(&interest, n.clamp(1, 100)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    fn dataset() -> Dataset {
        Dataset::from_recipes(
            vec![
                recipe(1, 10, 2, &["easy", "desserts"], &["sugar"]),
                recipe(2, 40, 6, &["main-dish", "easy"], &["beef"]),
                recipe(3, 25, 3, &["desserts"], &["egg"]),
            ],
            1,
        )
    }

    #[test]
    fn test_tag_statistics() {
        let resp = tag_statistics(&dataset(), &AppConfig::default(), Some(1)).unwrap();
        assert_eq!(resp.statistics.total_tags, 5);
        assert_eq!(resp.statistics.top_tags.len(), 1);
        let counted: usize = resp.tags_per_recipe_histogram.iter().map(|b| b.count).sum();
        assert_eq!(counted, 3);
    }

    #[test]
    fn test_best_tags_uses_categories() {
        let resp = find_best_tags(&dataset(), &AppConfig::default(), Some(1), 1).unwrap();
        assert_eq!(resp.tags_considered, 3);
        assert_eq!(resp.best.fastest[0].metrics.tag, "desserts");
        assert_eq!(resp.best.fastest[0].category, "course");
    }

    #[test]
    fn test_best_tags_without_matches() {
        assert!(find_best_tags(&dataset(), &AppConfig::default(), Some(10), 5).is_err());
    }

    #[test]
    fn test_list_tag_metrics() {
        let resp = list_tag_metrics(&dataset(), &AppConfig::default(), Some(2), 10).unwrap();
        assert_eq!(resp.total, 2);
        assert_eq!(resp.min_recipes, 2);
    }
}
