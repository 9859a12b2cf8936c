//! Recipe record
//!
//! One immutable row of the recipe dataset.

use serde::{Deserialize, Serialize};

use super::Nutrition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub minutes: i64,
    pub n_steps: i64,
    pub n_ingredients: i64,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub nutrition: Nutrition,
}

impl Recipe {
    /// Whether any tag contains `needle`, case-insensitively
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::recipe;

    #[test]
    fn test_has_tag_containing_is_case_insensitive() {
        let r = recipe(1, 10, 2, &["Healthy-2", "dessert"], &["egg"]);
        assert!(r.has_tag_containing("health"));
        assert!(r.has_tag_containing("DESS"));
        assert!(!r.has_tag_containing("drink"));
    }
}
