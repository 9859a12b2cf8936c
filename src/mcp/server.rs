//! MangeTaMain MCP Server Implementation
//!
//! Implements the MCP server with all recipe exploration tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::data::Dataset;
use crate::tools::complexity;
use crate::tools::foods;
use crate::tools::ingredients;
use crate::tools::nutriscore;
use crate::tools::reports;
use crate::tools::status::StatusTracker;
use crate::tools::tags;

/// MangeTaMain MCP Service
#[derive(Clone)]
pub struct MangetamainService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    dataset: Arc<Dataset>,
    config: Arc<AppConfig>,
    tool_router: ToolRouter<MangetamainService>,
}

impl MangetamainService {
    pub fn new(dataset: Dataset, config: AppConfig) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            dataset: Arc::new(dataset),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Default output path under the configured reports directory
    fn report_path(&self, file_name: &str) -> String {
        self.config.data.reports_dir.join(file_name).display().to_string()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Nutri-Score Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScoreNutritionParams {
    /// Nutrient name -> value, e.g. {"fat": 10, "sugar": 9, "protein": 10}.
    /// Names: calories, fat, sugar, sodium, protein, saturated_fat, carbohydrates
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutriScoreOverviewParams {
    /// Number of D/E recipes with a health tag to list (default 10)
    #[serde(default = "default_examples")]
    pub low_examples: usize,
}

fn default_examples() -> usize { 10 }

// ============================================================================
// Food / Drink Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyTagsParams {
    /// Tags of one recipe
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodDrinkSplitParams {
    /// Number of drink examples and drink tags to list (default 10)
    #[serde(default = "default_examples")]
    pub limit: usize,
}

// ============================================================================
// Tag Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TagStatisticsParams {
    /// Number of most frequent tags to list (default from configuration)
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TagMetricsParams {
    /// Minimum number of recipes per tag (default from configuration)
    pub min_recipes: Option<usize>,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BestTagsParams {
    /// Minimum number of recipes per tag (default from configuration)
    pub min_recipes: Option<usize>,
    /// Tags per ranking (default 5)
    #[serde(default = "default_best_n")]
    pub n: usize,
}

fn default_best_n() -> usize { 5 }

// ============================================================================
// Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientCountsParams {
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientWindowParams {
    /// Inclusive lower bound on occurrences (default from configuration)
    pub min_count: Option<u64>,
    /// Inclusive upper bound on occurrences (default from configuration)
    pub max_count: Option<u64>,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientNeighborsParams {
    /// Ingredient to look up, e.g. "garlic"
    pub ingredient: String,
    /// "jaccard" (default) or "conditional"
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Number of neighbours (default from configuration)
    pub k: Option<usize>,
    /// Minimum number of shared recipes (default from configuration)
    pub min_co: Option<u64>,
}

fn default_mode() -> String { "jaccard".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ContinentIngredientsParams {
    /// Ingredients per continent (default from configuration)
    pub top_n: Option<usize>,
    /// Share of recipes above which an ingredient is ignored, 0-1 (default 0.30)
    pub ubiquity_threshold: Option<f64>,
}

// ============================================================================
// Complexity Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FeatureDistributionParams {
    /// minutes (plotted on log scale), n_steps, n_ingredients or log_minutes
    pub feature: String,
    /// Histogram bins (default from configuration)
    pub bins: Option<usize>,
}

// ============================================================================
// Report Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateDashboardReportParams {
    /// Output PDF path (default: <reports_dir>/dashboard.pdf)
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportChartsParams {
    /// Output directory (default: <reports_dir>/charts)
    pub directory: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MangetamainService {
    // --- Status ---

    #[tool(description = "Get the current status of the explorer including build info, dataset size, and process information")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.dataset);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions describing every tool and how the figures are computed. Call this first when unsure which tool answers a question.")]
    fn dashboard_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DASHBOARD_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DASHBOARD_INSTRUCTIONS)]))
    }

    #[tool(description = "Show the active configuration: thresholds, grade bands, nutrition limits, keywords, categories and continents")]
    fn show_config(&self) -> Result<CallToolResult, McpError> {
        to_json(self.config.as_ref())
    }

    // --- Nutri-Score ---

    #[tool(description = "Compute Nutri-Score points and grade (A-E) for nutrient values. Protein lowers the score.")]
    fn score_nutrition(&self, Parameters(p): Parameters<ScoreNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = nutriscore::score_nutrition(&self.config, &p.values).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Grade distribution over all recipes within nutrition limits, health-tagged vs. all (also for food only), D/E food recipes with a health tag, and nutrient correlations")]
    fn nutriscore_overview(&self, Parameters(p): Parameters<NutriScoreOverviewParams>) -> Result<CallToolResult, McpError> {
        let result = nutriscore::nutriscore_overview(&self.dataset, &self.config, p.low_examples)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food / Drink ---

    #[tool(description = "Classify a tag list as food or drink using the drink keywords")]
    fn classify_tags(&self, Parameters(p): Parameters<ClassifyTagsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::classify_tags(&self.config, &p.tags).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Split the dataset into food and drink recipes and show the drink share")]
    fn food_drink_split(&self, Parameters(p): Parameters<FoodDrinkSplitParams>) -> Result<CallToolResult, McpError> {
        let result = foods::food_drink_split(&self.dataset, &self.config, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Tags ---

    #[tool(description = "General tag statistics: distinct tags, tags per recipe, most frequent tags")]
    fn tag_statistics(&self, Parameters(p): Parameters<TagStatisticsParams>) -> Result<CallToolResult, McpError> {
        let result = tags::tag_statistics(&self.dataset, &self.config, p.top_n).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Per-tag averages of minutes, steps and ingredients for tags used by enough recipes")]
    fn tag_metrics(&self, Parameters(p): Parameters<TagMetricsParams>) -> Result<CallToolResult, McpError> {
        let result = tags::list_tag_metrics(&self.dataset, &self.config, p.min_recipes, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Fastest, simplest, most popular and fewest-steps tags among the configured tag categories")]
    fn best_tags(&self, Parameters(p): Parameters<BestTagsParams>) -> Result<CallToolResult, McpError> {
        let result = tags::find_best_tags(&self.dataset, &self.config, p.min_recipes, p.n)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Ingredients ---

    #[tool(description = "Most used ingredients with a summary of the frequency distribution")]
    fn ingredient_counts(&self, Parameters(p): Parameters<IngredientCountsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::top_ingredients(&self.dataset, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Ingredients whose occurrence count lies within [min_count, max_count]")]
    fn ingredient_window(&self, Parameters(p): Parameters<IngredientWindowParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::ingredient_window(&self.dataset, &self.config, p.min_count, p.max_count, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Ingredients most associated with a given one, by Jaccard similarity or conditional probability P(B|A)")]
    fn ingredient_neighbors(&self, Parameters(p): Parameters<IngredientNeighborsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::ingredient_neighbours(&self.dataset, &self.config, &p.ingredient, &p.mode, p.k, p.min_co)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Typical ingredients per continent, excluding ingredients present in most recipes")]
    fn continent_ingredients(&self, Parameters(p): Parameters<ContinentIngredientsParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::continent_ingredients(&self.dataset, &self.config, p.top_n, p.ubiquity_threshold)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Complexity ---

    #[tool(description = "Distribution and correlation of preparation time (log scale), steps and ingredient count, by food/drink and by continent")]
    fn complexity_summary(&self) -> Result<CallToolResult, McpError> {
        let result = complexity::complexity_summary(&self.dataset, &self.config).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Describe statistics and histogram of one complexity feature after percentile trimming")]
    fn feature_distribution(&self, Parameters(p): Parameters<FeatureDistributionParams>) -> Result<CallToolResult, McpError> {
        let result = complexity::feature_distribution(&self.dataset, &self.config, &p.feature, p.bins)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate the PDF dashboard with Nutri-Score, food/drink, tag, ingredient and complexity pages")]
    fn generate_dashboard_report(&self, Parameters(p): Parameters<GenerateDashboardReportParams>) -> Result<CallToolResult, McpError> {
        let output_path = p.output_path.unwrap_or_else(|| self.report_path("dashboard.pdf"));
        let result = reports::generate_dashboard_report(&self.dataset, &self.config, &output_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Write every dashboard chart as a PNG file")]
    fn export_charts(&self, Parameters(p): Parameters<ExportChartsParams>) -> Result<CallToolResult, McpError> {
        let directory = p.directory.unwrap_or_else(|| self.report_path("charts"));
        let result = reports::export_charts(&self.dataset, &self.config, &directory)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for MangetamainService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mangetamain".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MangeTaMain Recipe Explorer".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MangeTaMain - statistics over a recipe dataset. \
                 Call dashboard_instructions for details. \
                 Nutri-Score: score_nutrition, nutriscore_overview. \
                 Food/drink: classify_tags, food_drink_split. \
                 Tags: tag_statistics, tag_metrics, best_tags. \
                 Ingredients: ingredient_counts, ingredient_window, ingredient_neighbors, continent_ingredients. \
                 Complexity: complexity_summary, feature_distribution. \
                 Outputs: generate_dashboard_report (PDF), export_charts (PNG). \
                 Service: status, show_config."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::models::fixtures::recipe;

    #[test]
    fn test_report_path_uses_reports_dir() {
        let mut config = AppConfig::default();
        config.data.reports_dir = PathBuf::from("/tmp/out");
        let service = MangetamainService::new(Dataset::from_recipes(vec![recipe(1, 5, 1, &[], &["salt"])], 1), config);
        assert_eq!(service.report_path("dashboard.pdf"), "/tmp/out/dashboard.pdf");
    }

    #[test]
    fn test_params_defaults() {
        let p: IngredientNeighborsParams = serde_json::from_str(r#"{"ingredient": "garlic"}"#).unwrap();
        assert_eq!(p.mode, "jaccard");
        assert!(p.k.is_none());
        let p: TagMetricsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
    }
}
