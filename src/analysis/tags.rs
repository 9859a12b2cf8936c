//! Tag statistics

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::analysis::stats::{mean, Describe};
use crate::models::Recipe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// Occurrences per tag, most frequent first, ties by name
pub fn tag_counts<'a, I>(recipes: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for recipe in recipes {
        for tag in &recipe.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    let mut out: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct TagStatistics {
    pub total_recipes: usize,
    pub total_unique_tags: usize,
    pub total_tags: u64,
    pub tags_per_recipe_mean: f64,
    pub tags_per_recipe_median: f64,
    pub tags_per_recipe_min: f64,
    pub tags_per_recipe_max: f64,
    /// Average occurrences per distinct tag
    pub avg_tags_general: f64,
    pub tags_per_recipe_stats: Option<Describe>,
    pub tag_counts_stats: Option<Describe>,
    pub top_tags: Vec<TagCount>,
}

pub fn general_statistics(recipes: &[Recipe], top_n: usize) -> TagStatistics {
    let per_recipe: Vec<f64> = recipes.iter().map(|r| r.tags.len() as f64).collect();
    let counts = tag_counts(recipes);
    let count_values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
    let total_tags: u64 = counts.iter().map(|c| c.count).sum();

    let per_recipe_stats = Describe::of(&per_recipe);
    let pick = |f: fn(&Describe) -> f64| per_recipe_stats.as_ref().map(f).unwrap_or(0.0);

    TagStatistics {
        total_recipes: recipes.len(),
        total_unique_tags: counts.len(),
        total_tags,
        tags_per_recipe_mean: pick(|d| d.mean),
        tags_per_recipe_median: pick(|d| d.median),
        tags_per_recipe_min: pick(|d| d.min),
        tags_per_recipe_max: pick(|d| d.max),
        avg_tags_general: if counts.is_empty() {
            0.0
        } else {
            total_tags as f64 / counts.len() as f64
        },
        tags_per_recipe_stats: per_recipe_stats.clone(),
        tag_counts_stats: Describe::of(&count_values),
        top_tags: counts.into_iter().take(top_n).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagMetrics {
    pub tag: String,
    pub n_recipes: usize,
    pub avg_minutes: f64,
    pub avg_steps: f64,
    pub avg_ingredients: f64,
}

/// Per-tag averages over the recipes carrying the tag; tags with fewer than
/// `min_recipes` recipes are dropped. Most used first.
pub fn tag_metrics(recipes: &[Recipe], min_recipes: usize) -> Vec<TagMetrics> {
    let mut by_tag: HashMap<&str, Vec<&Recipe>> = HashMap::new();
    for recipe in recipes {
        let distinct: BTreeSet<&str> = recipe.tags.iter().map(|t| t.as_str()).collect();
        for tag in distinct {
            by_tag.entry(tag).or_default().push(recipe);
        }
    }

    let mut out: Vec<TagMetrics> = by_tag
        .into_iter()
        .filter(|(_, rs)| rs.len() >= min_recipes)
        .map(|(tag, rs)| {
            let avg = |f: fn(&Recipe) -> f64| mean(&rs.iter().map(|r| f(r)).collect::<Vec<_>>());
            TagMetrics {
                tag: tag.to_string(),
                n_recipes: rs.len(),
                avg_minutes: avg(|r| r.minutes as f64),
                avg_steps: avg(|r| r.n_steps as f64),
                avg_ingredients: avg(|r| r.n_ingredients as f64),
            }
        })
        .collect();
    out.sort_by(|a, b| b.n_recipes.cmp(&a.n_recipes).then_with(|| a.tag.cmp(&b.tag)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagOfInterest {
    pub category: String,
    #[serde(flatten)]
    pub metrics: TagMetrics,
}

/// Keep tags listed under a category, annotated with it
pub fn tags_of_interest(
    metrics: &[TagMetrics],
    categories: &BTreeMap<String, Vec<String>>,
) -> Vec<TagOfInterest> {
    let lookup: HashMap<&str, &str> = categories
        .iter()
        .flat_map(|(cat, tags)| tags.iter().map(move |t| (t.as_str(), cat.as_str())))
        .collect();

    metrics
        .iter()
        .filter_map(|m| {
            lookup.get(m.tag.as_str()).map(|cat| TagOfInterest {
                category: cat.to_string(),
                metrics: m.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct BestTags {
    pub fastest: Vec<TagOfInterest>,
    pub simplest: Vec<TagOfInterest>,
    pub most_popular: Vec<TagOfInterest>,
    pub fewest_steps: Vec<TagOfInterest>,
}

pub fn best_tags(interest: &[TagOfInterest], n: usize) -> BestTags {
    let ranked = |key: fn(&TagMetrics) -> f64, ascending: bool| {
        let mut v = interest.to_vec();
        v.sort_by(|a, b| {
            let ord = key(&a.metrics).total_cmp(&key(&b.metrics));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        v.truncate(n);
        v
    };

    BestTags {
        fastest: ranked(|m| m.avg_minutes, true),
        simplest: ranked(|m| m.avg_ingredients, true),
        most_popular: ranked(|m| m.n_recipes as f64, false),
        fewest_steps: ranked(|m| m.avg_steps, true),
    }
}
