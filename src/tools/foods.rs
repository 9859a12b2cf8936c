//! Food / Drink MCP Tools

use serde::Serialize;

use crate::analysis::classifier::{DrinkClassifier, PartitionSummary};
use crate::analysis::tags::{tag_counts, TagCount};
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::tools::nutriscore::RecipeRef;

/// Response for classify_tags
#[derive(Debug, Serialize)]
pub struct ClassifyTagsResponse {
    pub is_drink: bool,
    pub kind: &'static str,
    /// Tags that matched a drink keyword
    pub matching_tags: Vec<String>,
}

/// Response for food_drink_split
#[derive(Debug, Serialize)]
pub struct FoodDrinkResponse {
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub summary: PartitionSummary,
    pub top_drink_tags: Vec<TagCount>,
    pub drink_examples: Vec<RecipeRef>,
}

fn classifier(config: &AppConfig) -> Result<DrinkClassifier, String> {
    DrinkClassifier::new(&config.classifier.drink_keywords).map_err(|e| format!("Invalid drink keywords: {}", e))
}

pub fn classify_tags(config: &AppConfig, tags: &[String]) -> Result<ClassifyTagsResponse, String> {
    let classifier = classifier(config)?;
    let matching_tags: Vec<String> = tags.iter().filter(|t| classifier.is_drink_tag(t)).cloned().collect();
    let is_drink = !matching_tags.is_empty();
    Ok(ClassifyTagsResponse {
        is_drink,
        kind: if is_drink { "drink" } else { "food" },
        matching_tags,
    })
}

pub fn food_drink_split(dataset: &Dataset, config: &AppConfig, limit: usize) -> Result<FoodDrinkResponse, String> {
    let classifier = classifier(config)?;
    let partition = classifier.partition(&dataset.recipes);

    let mut top_drink_tags = tag_counts(partition.drink.iter().copied());
    top_drink_tags.truncate(limit);

    Ok(FoodDrinkResponse {
        keywords: config.classifier.drink_keywords.clone(),
        summary: partition.summary(),
        top_drink_tags,
        drink_examples: partition.drink.iter().take(limit).map(|r| RecipeRef::from(*r)).collect(),
    })
}
