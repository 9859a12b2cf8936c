//! Ingredient frequencies, co-occurrence and similarity

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::analysis::stats::Describe;
use crate::data::DataError;
use crate::models::Recipe;

/// (recipe id, normalised ingredient) pairs
pub fn explode(recipes: &[Recipe]) -> Vec<(i64, String)> {
    recipes
        .iter()
        .flat_map(|r| {
            r.ingredients
                .iter()
                .map(|i| i.trim().to_lowercase())
                .filter(|i| !i.is_empty())
                .map(move |i| (r.id, i))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientCount {
    pub ingredient: String,
    pub count: u64,
}

fn sorted_counts(counts: HashMap<&str, u64>) -> Vec<IngredientCount> {
    let mut out: Vec<IngredientCount> = counts
        .into_iter()
        .map(|(ingredient, count)| IngredientCount {
            ingredient: ingredient.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ingredient.cmp(&b.ingredient)));
    out
}

/// Occurrences per ingredient, most frequent first
pub fn ingredient_counts(pairs: &[(i64, String)]) -> Vec<IngredientCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for (_, ingredient) in pairs {
        *counts.entry(ingredient.as_str()).or_default() += 1;
    }
    sorted_counts(counts)
}

/// Counts within `[min, max]`, or `>= min` when `max` is `None`
pub fn filter_counts_window(counts: &[IngredientCount], min: u64, max: Option<u64>) -> Vec<IngredientCount> {
    counts
        .iter()
        .filter(|c| c.count >= min && max.map_or(true, |m| c.count <= m))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientSummary {
    pub unique_ingredients: usize,
    pub total_occurrences: u64,
    pub counts: Option<Describe>,
}

pub fn summarize(counts: &[IngredientCount]) -> IngredientSummary {
    let values: Vec<f64> = counts.iter().map(|c| c.count as f64).collect();
    IngredientSummary {
        unique_ingredients: counts.len(),
        total_occurrences: counts.iter().map(|c| c.count).sum(),
        counts: Describe::of(&values),
    }
}

/// Square matrix indexed by ingredient name on both axes
#[derive(Debug, Clone)]
pub struct IngredientMatrix {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl IngredientMatrix {
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let n = labels.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(DataError::Shape(format!(
                "expected a {}x{} matrix, got {} rows",
                n,
                n,
                values.len()
            )));
        }
        let index = labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        Ok(Self { labels, index, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.values[self.position(a)?][self.position(b)?])
    }

    fn row_for(&self, focus: &str) -> Result<(usize, &[f64]), DataError> {
        let i = self
            .position(focus)
            .ok_or_else(|| DataError::UnknownIngredient(focus.to_string()))?;
        Ok((i, &self.values[i]))
    }
}

/// Number of recipes containing both ingredients; the diagonal holds the
/// number of recipes containing each ingredient.
#[derive(Debug, Clone)]
pub struct CooccurrenceMatrix {
    counts: IngredientMatrix,
}

impl CooccurrenceMatrix {
    /// Restricted to ingredients present in at least `min_count` recipes.
    /// Duplicates inside one recipe count once.
    pub fn build(recipes: &[Recipe], min_count: u64) -> Self {
        let per_recipe: Vec<BTreeSet<String>> = recipes
            .iter()
            .map(|r| {
                r.ingredients
                    .iter()
                    .map(|i| i.trim().to_lowercase())
                    .filter(|i| !i.is_empty())
                    .collect()
            })
            .collect();

        let mut recipe_counts: BTreeMap<&str, u64> = BTreeMap::new();
        for set in &per_recipe {
            for ingredient in set {
                *recipe_counts.entry(ingredient.as_str()).or_default() += 1;
            }
        }

        let labels: Vec<String> = recipe_counts
            .into_iter()
            .filter(|(_, c)| *c >= min_count)
            .map(|(i, _)| i.to_string())
            .collect();
        let index: HashMap<&str, usize> = labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();

        let n = labels.len();
        let mut values = vec![vec![0.0; n]; n];
        for set in &per_recipe {
            let present: Vec<usize> = set.iter().filter_map(|i| index.get(i.as_str()).copied()).collect();
            for &a in &present {
                for &b in &present {
                    values[a][b] += 1.0;
                }
            }
        }

        let index = labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        Self {
            counts: IngredientMatrix { labels, index, values },
        }
    }

    pub fn from_counts(counts: IngredientMatrix) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &IngredientMatrix {
        &self.counts
    }

    pub fn into_counts(self) -> IngredientMatrix {
        self.counts
    }

    /// |A and B| / |A or B| for every pair
    pub fn jaccard(&self) -> IngredientMatrix {
        let co = &self.counts.values;
        let n = co.len();
        let mut values = vec![vec![0.0; n]; n];
        for a in 0..n {
            for b in 0..n {
                let union = co[a][a] + co[b][b] - co[a][b];
                values[a][b] = if union > 0.0 { co[a][b] / union } else { 0.0 };
            }
        }
        IngredientMatrix {
            labels: self.counts.labels.clone(),
            index: self.counts.index.clone(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbour {
    pub ingredient: String,
    pub score: f64,
    pub co_count: u64,
}

fn rank_neighbours(mut out: Vec<Neighbour>, k: usize) -> Vec<Neighbour> {
    out.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.co_count.cmp(&a.co_count))
            .then_with(|| a.ingredient.cmp(&b.ingredient))
    });
    out.truncate(k);
    out
}

/// Ingredients most similar to `focus` by Jaccard score, among those
/// appearing with it in at least `min_co` recipes.
pub fn top_cooccurrences_for(
    focus: &str,
    jaccard: &IngredientMatrix,
    co: &IngredientMatrix,
    k: usize,
    min_co: u64,
) -> Result<Vec<Neighbour>, DataError> {
    let (a, co_row) = co.row_for(focus)?;
    let (_, j_row) = jaccard.row_for(focus)?;

    let candidates = co
        .labels
        .iter()
        .enumerate()
        .filter(|(b, _)| *b != a && co_row[*b] >= min_co as f64)
        .filter_map(|(b, name)| {
            let j = jaccard.position(name)?;
            Some(Neighbour {
                ingredient: name.clone(),
                score: j_row[j],
                co_count: co_row[b] as u64,
            })
        })
        .collect();

    Ok(rank_neighbours(candidates, k))
}

/// P(B | focus) = co[focus, B] / co[focus, focus]
pub fn top_conditional_for(
    focus: &str,
    co: &IngredientMatrix,
    k: usize,
    min_co: u64,
) -> Result<Vec<Neighbour>, DataError> {
    let (a, row) = co.row_for(focus)?;
    let base = row[a];
    if base <= 0.0 {
        return Ok(Vec::new());
    }

    let candidates = co
        .labels
        .iter()
        .enumerate()
        .filter(|(b, _)| *b != a && row[*b] >= min_co as f64)
        .map(|(b, name)| Neighbour {
            ingredient: name.clone(),
            score: row[b] / base,
            co_count: row[b] as u64,
        })
        .collect();

    Ok(rank_neighbours(candidates, k))
}

/// First tag of the recipe that belongs to a continent's cuisine list
pub fn assign_continent<'c>(recipe: &Recipe, continents: &'c BTreeMap<String, Vec<String>>) -> Option<&'c str> {
    recipe.tags.iter().find_map(|tag| {
        continents
            .iter()
            .find(|(_, cuisines)| cuisines.iter().any(|c| c == tag))
            .map(|(name, _)| name.as_str())
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ContinentIngredients {
    pub continent: String,
    pub recipes: usize,
    pub top: Vec<IngredientCount>,
}

/// Most used ingredients per continent, leaving out the ones present in
/// more than `global_threshold` of the recipes with a continent. Largest
/// continents first.
pub fn continent_top_ingredients(
    recipes: &[Recipe],
    continents: &BTreeMap<String, Vec<String>>,
    top_n: usize,
    global_threshold: f64,
) -> Vec<ContinentIngredients> {
    let assigned: Vec<(&str, &Recipe)> = recipes
        .iter()
        .filter_map(|r| assign_continent(r, continents).map(|c| (c, r)))
        .collect();
    if assigned.is_empty() {
        return Vec::new();
    }

    let normalised = |r: &Recipe| -> HashSet<String> {
        r.ingredients
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect()
    };

    let mut global: HashMap<String, u64> = HashMap::new();
    for (_, r) in &assigned {
        for ingredient in normalised(*r) {
            *global.entry(ingredient).or_default() += 1;
        }
    }
    let total = assigned.len() as f64;
    let ubiquitous: HashSet<&str> = global
        .iter()
        .filter(|(_, n)| **n as f64 / total > global_threshold)
        .map(|(i, _)| i.as_str())
        .collect();

    let mut by_continent: BTreeMap<&str, (usize, HashMap<String, u64>)> = BTreeMap::new();
    for (continent, r) in &assigned {
        let entry = by_continent.entry(*continent).or_default();
        entry.0 += 1;
        for ingredient in r.ingredients.iter().map(|i| i.trim().to_lowercase()) {
            if !ingredient.is_empty() && !ubiquitous.contains(ingredient.as_str()) {
                *entry.1.entry(ingredient).or_default() += 1;
            }
        }
    }

    let mut out: Vec<ContinentIngredients> = by_continent
        .into_iter()
        .map(|(continent, (n, counts))| {
            let mut top = sorted_counts(counts.iter().map(|(k, v)| (k.as_str(), *v)).collect());
            top.truncate(top_n);
            ContinentIngredients {
                continent: continent.to_string(),
                recipes: n,
                top,
            }
        })
        .collect();
    out.sort_by(|a, b| b.recipes.cmp(&a.recipes).then_with(|| a.continent.cmp(&b.continent)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::recipe;

    fn recipes() -> Vec<Recipe> {
        vec![
            recipe(1, 10, 2, &["italian"], &["Tomato", " basil ", "salt", "tomato"]),
            recipe(2, 10, 2, &["italian", "mexican"], &["tomato", "salt", "garlic"]),
            recipe(3, 10, 2, &["mexican"], &["beans", "salt", ""]),
            recipe(4, 10, 2, &["easy"], &["basil", "salt"]),
        ]
    }

    #[test]
    fn test_explode_normalises() {
        let pairs = explode(&recipes());
        assert!(pairs.contains(&(1, "basil".to_string())));
        assert!(pairs.contains(&(1, "tomato".to_string())));
        assert!(!pairs.iter().any(|(_, i)| i.is_empty()));
        assert_eq!(pairs.len(), 11);
    }

    #[test]
    fn test_counts_and_window() {
        let counts = ingredient_counts(&explode(&recipes()));
        assert_eq!(counts[0], IngredientCount { ingredient: "salt".into(), count: 4 });
        assert_eq!(counts[1], IngredientCount { ingredient: "tomato".into(), count: 3 });

        let window = filter_counts_window(&counts, 2, Some(3));
        let names: Vec<&str> = window.iter().map(|c| c.ingredient.as_str()).collect();
        assert_eq!(names, vec!["tomato", "basil"]);
        assert_eq!(filter_counts_window(&counts, 2, None).len(), 3);
        assert!(filter_counts_window(&counts, 10, None).is_empty());

        let summary = summarize(&counts);
        assert_eq!(summary.unique_ingredients, 5);
        assert_eq!(summary.total_occurrences, 11);
    }

    #[test]
    fn test_cooccurrence_counts_recipes_once() {
        let co = CooccurrenceMatrix::build(&recipes(), 1);
        let m = co.counts();
        assert_eq!(m.get("tomato", "tomato"), Some(2.0));
        assert_eq!(m.get("salt", "salt"), Some(4.0));
        assert_eq!(m.get("tomato", "salt"), Some(2.0));
        assert_eq!(m.get("salt", "tomato"), Some(2.0));
        assert_eq!(m.get("beans", "garlic"), Some(0.0));

        let restricted = CooccurrenceMatrix::build(&recipes(), 2);
        assert_eq!(restricted.counts().labels(), &["basil", "salt", "tomato"]);
    }

    #[test]
    fn test_jaccard() {
        let j = CooccurrenceMatrix::build(&recipes(), 1).jaccard();
        // tomato in {1,2}, salt in {1,2,3,4}
        assert!((j.get("tomato", "salt").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(j.get("salt", "salt"), Some(1.0));
        // basil {1,4}, tomato {1,2}
        assert!((j.get("basil", "tomato").unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_symmetric_and_bounded() {
        let co = CooccurrenceMatrix::build(&recipes(), 1);
        let j = co.jaccard();
        let rows = j.rows();
        for a in 0..j.len() {
            for b in 0..j.len() {
                assert_eq!(rows[a][b], rows[b][a], "{} / {}", j.labels()[a], j.labels()[b]);
                assert!((0.0..=1.0).contains(&rows[a][b]));
            }
        }

        for focus in co.counts().labels() {
            let top = top_conditional_for(focus, co.counts(), 100, 1).unwrap();
            assert!(top.iter().all(|n| n.score > 0.0 && n.score <= 1.0), "{}", focus);
        }
    }

    #[test]
    fn test_top_cooccurrences_excludes_focus_and_low_counts() {
        let co = CooccurrenceMatrix::build(&recipes(), 1);
        let j = co.jaccard();
        let top = top_cooccurrences_for("tomato", &j, co.counts(), 10, 1).unwrap();
        assert!(top.iter().all(|n| n.ingredient != "tomato"));
        assert_eq!(top[0].ingredient, "salt");
        assert_eq!(top[0].co_count, 2);

        let strict = top_cooccurrences_for("tomato", &j, co.counts(), 10, 2).unwrap();
        assert_eq!(strict.len(), 1);

        let limited = top_cooccurrences_for("tomato", &j, co.counts(), 1, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_unknown_focus_is_an_error() {
        let co = CooccurrenceMatrix::build(&recipes(), 1);
        let err = top_conditional_for("saffron", co.counts(), 5, 1).unwrap_err();
        assert!(matches!(err, DataError::UnknownIngredient(ref i) if i == "saffron"));
    }

    #[test]
    fn test_conditional_probability() {
        let co = CooccurrenceMatrix::build(&recipes(), 1);
        let top = top_conditional_for("tomato", co.counts(), 10, 1).unwrap();
        // salt appears in every tomato recipe
        assert_eq!(top[0].ingredient, "salt");
        assert!((top[0].score - 1.0).abs() < 1e-12);
        let garlic = top.iter().find(|n| n.ingredient == "garlic").unwrap();
        assert!((garlic.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_continent_top_ingredients() {
        let continents = BTreeMap::from([
            ("Europe".to_string(), vec!["italian".to_string()]),
            ("North America".to_string(), vec!["mexican".to_string()]),
        ]);
        let recipes = recipes();
        assert_eq!(assign_continent(&recipes[1], &continents), Some("Europe"));
        assert_eq!(assign_continent(&recipes[3], &continents), None);

        let out = continent_top_ingredients(&recipes, &continents, 10, 0.30);
        assert_eq!(out[0].continent, "Europe");
        assert_eq!(out[0].recipes, 2);
        // salt and tomato are in more than 30% of the continent recipes
        assert!(out.iter().all(|c| c.top.iter().all(|i| i.ingredient != "salt")));
        let europe: Vec<&str> = out[0].top.iter().map(|i| i.ingredient.as_str()).collect();
        assert!(!europe.contains(&"tomato"));
        assert_eq!(out[1].continent, "North America");
        assert_eq!(out[1].top.len(), 0);
    }

    #[test]
    fn test_matrix_shape_is_checked() {
        assert!(IngredientMatrix::new(vec!["a".into()], vec![vec![1.0, 2.0]]).is_err());
        assert!(IngredientMatrix::new(vec!["a".into()], vec![vec![1.0]]).is_ok());
    }
}
