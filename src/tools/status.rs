//! MangeTaMain Status Tool
//!
//! Provides runtime status information about the explorer service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::data::Dataset;

/// Usage instructions for AI assistants
pub const DASHBOARD_INSTRUCTIONS: &str = r#"
# MangeTaMain Recipe Explorer Instructions

The server keeps one recipe dataset in memory and answers statistical
questions about it. Every tool is read-only except the report and chart
exports, which write files.

## Nutri-Score

- `score_nutrition` grades an ad-hoc nutrition map, e.g.
  `{"fat": 10, "sugar": 9, "protein": 10}` -> 3 points, grade B.
  Unknown nutrients are ignored; nutrients without a threshold table add 0.
- `nutriscore_overview` grades every recipe inside the nutrition limits and
  compares recipes tagged "health" (configurable) with the whole set, then
  repeats the comparison on food recipes only (`food_health`).
  Set `low_examples` to list D/E food recipes that still carry a health tag;
  drinks are left out since their Nutri-Score scheme differs.

Grades: A (0-2 points), B (3-10), C (11-18), D (19-40), E (41-100).
Totals outside every band, negative ones included, are graded E.

## Food vs. drink

- `classify_tags` tells whether a tag list is a drink.
- `food_drink_split` counts both sides. A recipe with any drink keyword tag
  is a drink, even when it also has food tags.

## Tags

- `tag_statistics`: general figures and the most frequent tags.
- `tag_metrics`: averages per tag (minutes, steps, ingredients), tags with
  fewer than `min_recipes` recipes left out.
- `best_tags`: fastest, simplest, most popular and fewest-steps tags among
  the configured categories.

## Ingredients

- `ingredient_counts`, `ingredient_window` (frequency window [min, max]).
- `ingredient_neighbors` with `mode` = "jaccard" (similarity) or
  "conditional" (P(B | focus)). Unknown ingredients return an error, list
  candidates with `ingredient_window` first.
- `continent_ingredients`: typical ingredients per continent, ubiquitous
  ingredients excluded.

## Complexity

- `complexity_summary`: minutes (log scale), steps and ingredient counts
  after dropping the top 1% of each, with their correlations.
- `feature_distribution`: one feature's statistics and histogram.

## Outputs

- `generate_dashboard_report` writes a multi-page PDF.
- `export_charts` writes the dashboard charts as PNG files.
"#;

/// Runtime status of the explorer service
#[derive(Debug, Clone, Serialize)]
pub struct ExplorerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Dataset information
    pub recipes_loaded: usize,
    pub matrix_ingredients: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn get_status(&self, dataset: &Dataset) -> ExplorerStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ExplorerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            recipes_loaded: dataset.recipes.len(),
            matrix_ingredients: dataset.co_occurrence.len(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    #[test]
    fn test_status_reports_dataset_size() {
        let dataset = Dataset::from_recipes(vec![recipe(1, 5, 1, &[], &["salt"])], 1);
        let status = StatusTracker::new().get_status(&dataset);
        assert_eq!(status.recipes_loaded, 1);
        assert_eq!(status.matrix_ingredients, 1);
        assert_eq!(status.process_id, std::process::id());
    }
}
