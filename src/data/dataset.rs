//! In-memory dataset shared by every tool call

use tracing::{info, warn};

use super::loader::load_recipes;
use super::matrix::load_matrix;
use super::DataResult;
use crate::analysis::ingredients::{CooccurrenceMatrix, IngredientMatrix};
use crate::config::DataConfig;
use crate::models::Recipe;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub recipes: Vec<Recipe>,
    pub co_occurrence: IngredientMatrix,
    pub jaccard: IngredientMatrix,
}

impl Dataset {
    /// Load the recipes and the ingredient matrices. Matrices missing on
    /// disk are computed from the recipes instead.
    pub fn load(config: &DataConfig) -> DataResult<Self> {
        let recipes = load_recipes(&config.recipes_csv)?;

        let (co_occurrence, jaccard) = if config.co_occurrence_csv.exists() {
            let co = load_matrix(&config.co_occurrence_csv)?;
            if config.jaccard_csv.exists() {
                (co, load_matrix(&config.jaccard_csv)?)
            } else {
                warn!("Jaccard matrix not found at {:?}, deriving it from co-occurrence counts", config.jaccard_csv);
                let co = CooccurrenceMatrix::from_counts(co);
                let jaccard = co.jaccard();
                (co.into_counts(), jaccard)
            }
        } else {
            warn!(
                "Ingredient matrices not found at {:?}, computing them (min count {})",
                config.co_occurrence_csv, config.matrix_min_count
            );
            let co = CooccurrenceMatrix::build(&recipes, config.matrix_min_count);
            let jaccard = co.jaccard();
            (co.into_counts(), jaccard)
        };

        info!(
            "Dataset ready: {} recipes, {} ingredients in matrices",
            recipes.len(),
            co_occurrence.len()
        );
        Ok(Self {
            recipes,
            co_occurrence,
            jaccard,
        })
    }

    pub fn from_recipes(recipes: Vec<Recipe>, matrix_min_count: u64) -> Self {
        let co = CooccurrenceMatrix::build(&recipes, matrix_min_count);
        let jaccard = co.jaccard();
        Self {
            recipes,
            co_occurrence: co.into_counts(),
            jaccard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::save_matrix;
    use std::fs;

    const CSV: &str = concat!(
        "id,name,minutes,n_steps,n_ingredients,tags,ingredients,nutrition\n",
        "1,a,10,2,2,\"['easy']\",\"['salt', 'egg']\",\"[1, 2, 3, 4, 5, 6, 7]\"\n",
        "2,b,20,3,2,\"['cocktail']\",\"['salt', 'rum']\",\"[1, 2, 3, 4, 5, 6, 7]\"\n",
    );

    fn config(dir: &std::path::Path) -> DataConfig {
        DataConfig {
            recipes_csv: dir.join("recipes.csv"),
            co_occurrence_csv: dir.join("artifacts/co_occurrence.csv"),
            jaccard_csv: dir.join("artifacts/jaccard.csv"),
            reports_dir: dir.join("reports"),
            matrix_min_count: 1,
        }
    }

    #[test]
    fn test_missing_matrices_are_computed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recipes.csv"), CSV).unwrap();

        let ds = Dataset::load(&config(dir.path())).unwrap();
        assert_eq!(ds.recipes.len(), 2);
        assert_eq!(ds.co_occurrence.get("salt", "salt"), Some(2.0));
        assert_eq!(ds.jaccard.get("salt", "egg"), Some(0.5));
    }

    #[test]
    fn test_matrices_on_disk_are_used() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recipes.csv"), CSV).unwrap();
        let cfg = config(dir.path());

        let only_salt = IngredientMatrix::new(vec!["salt".into()], vec![vec![99.0]]).unwrap();
        save_matrix(&only_salt, &cfg.co_occurrence_csv).unwrap();
        save_matrix(&only_salt, &cfg.jaccard_csv).unwrap();

        let ds = Dataset::load(&cfg).unwrap();
        assert_eq!(ds.co_occurrence.labels(), &["salt"]);
        assert_eq!(ds.co_occurrence.get("salt", "salt"), Some(99.0));
    }

    #[test]
    fn test_jaccard_derived_from_counts_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recipes.csv"), CSV).unwrap();
        let cfg = config(dir.path());

        let counts = IngredientMatrix::new(
            vec!["egg".into(), "salt".into()],
            vec![vec![2.0, 1.0], vec![1.0, 3.0]],
        )
        .unwrap();
        save_matrix(&counts, &cfg.co_occurrence_csv).unwrap();

        let ds = Dataset::load(&cfg).unwrap();
        assert_eq!(ds.co_occurrence.get("salt", "salt"), Some(3.0));
        // 1 / (2 + 3 - 1)
        assert_eq!(ds.jaccard.get("egg", "salt"), Some(0.25));
    }
}
