//! Food / drink classification
//!
//! A recipe is a drink when any of its tags matches the keyword alternation
//! (case-insensitive, substring). Everything else is food, so a recipe with
//! both food and drink tags lands on the drink side.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::models::Recipe;

#[derive(Debug, Clone)]
pub struct DrinkClassifier {
    /// `None` when no keywords are configured
    pattern: Option<Regex>,
}

impl DrinkClassifier {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let fragments: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();

        if fragments.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&fragments.join("|"))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_drink_tag(&self, tag: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(tag))
    }

    pub fn is_drink<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.is_drink_tag(t.as_ref()))
    }

    /// Ids of recipes with at least one drink tag
    pub fn drink_ids<'a, I>(&self, recipes: I) -> HashSet<i64>
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        recipes
            .into_iter()
            .filter(|r| self.is_drink(&r.tags))
            .map(|r| r.id)
            .collect()
    }

    /// Split into disjoint, exhaustive food and drink subsets, input order kept
    pub fn partition<'a>(&self, recipes: &'a [Recipe]) -> Partition<'a> {
        let drink_ids = self.drink_ids(recipes);
        let (drink, food): (Vec<&Recipe>, Vec<&Recipe>) =
            recipes.iter().partition(|r| drink_ids.contains(&r.id));
        Partition { food, drink }
    }
}

#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub food: Vec<&'a Recipe>,
    pub drink: Vec<&'a Recipe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub food_recipes: usize,
    pub drink_recipes: usize,
    pub drink_share_percent: f64,
}

impl Partition<'_> {
    pub fn summary(&self) -> PartitionSummary {
        let total = self.food.len() + self.drink.len();
        PartitionSummary {
            food_recipes: self.food.len(),
            drink_recipes: self.drink.len(),
            drink_share_percent: if total == 0 {
                0.0
            } else {
                self.drink.len() as f64 / total as f64 * 100.0
            },
        }
    }
}
