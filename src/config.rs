//! Configuration
//!
//! Loaded from a TOML file. Every section falls back to its defaults when
//! absent, so an empty file (or no file at all) yields a working setup.
//!
//! Resolution:
//! - `MANGETAMAIN_CONFIG` names the file, else `config/mangetamain.toml`
//! - `MANGETAMAIN_DATA_DIR`, when set, is prepended to relative data paths

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::classifier::DrinkClassifier;
use crate::models::{Grade, Nutrient};

pub const CONFIG_ENV: &str = "MANGETAMAIN_CONFIG";
pub const DATA_DIR_ENV: &str = "MANGETAMAIN_DATA_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "config/mangetamain.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub nutriscore: NutriScoreConfig,
    /// Inclusive plausibility window per nutrient, used before grading
    pub nutrition_limits: BTreeMap<Nutrient, Limits>,
    pub classifier: ClassifierConfig,
    pub tags: TagConfig,
    pub complexity: ComplexityConfig,
    pub ingredients: IngredientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            nutriscore: NutriScoreConfig::default(),
            nutrition_limits: default_nutrition_limits(),
            classifier: ClassifierConfig::default(),
            tags: TagConfig::default(),
            complexity: ComplexityConfig::default(),
            ingredients: IngredientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub recipes_csv: PathBuf,
    pub co_occurrence_csv: PathBuf,
    pub jaccard_csv: PathBuf,
    pub reports_dir: PathBuf,
    /// Ingredients seen in fewer recipes are left out of the matrices
    pub matrix_min_count: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            recipes_csv: PathBuf::from("data/RAW_recipes.csv"),
            co_occurrence_csv: PathBuf::from("artifacts/co_occurrence.csv"),
            jaccard_csv: PathBuf::from("artifacts/jaccard.csv"),
            reports_dir: PathBuf::from("reports"),
            matrix_min_count: 200,
        }
    }
}

impl DataConfig {
    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.recipes_csv,
            &mut self.co_occurrence_csv,
            &mut self.jaccard_csv,
            &mut self.reports_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Closed integer interval of total points mapped to a grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub low: i32,
    pub high: i32,
    pub grade: Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutriScoreConfig {
    /// Ascending cut points per nutrient
    pub thresholds: BTreeMap<Nutrient, Vec<f64>>,
    pub grades: Vec<GradeBand>,
}

impl Default for NutriScoreConfig {
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (Nutrient::Calories, vec![80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0, 720.0, 800.0]),
            (Nutrient::Fat, vec![3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0]),
            (Nutrient::Sugar, vec![4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.0, 36.0, 40.0, 45.0]),
            (Nutrient::Sodium, vec![4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 28.0, 32.0, 36.0, 40.0]),
            (Nutrient::Protein, vec![8.0, 16.0, 24.0, 32.0, 40.0]),
            (Nutrient::SaturatedFat, vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0]),
            (Nutrient::Carbohydrates, vec![3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0]),
        ]);
        let grades = vec![
            GradeBand { low: 0, high: 2, grade: Grade::A },
            GradeBand { low: 3, high: 10, grade: Grade::B },
            GradeBand { low: 11, high: 18, grade: Grade::C },
            GradeBand { low: 19, high: 40, grade: Grade::D },
            GradeBand { low: 41, high: 100, grade: Grade::E },
        ];
        Self { thresholds, grades }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

fn default_nutrition_limits() -> BTreeMap<Nutrient, Limits> {
    BTreeMap::from([
        (Nutrient::Calories, Limits { min: 0.0, max: 3000.0 }),
        (Nutrient::Fat, Limits { min: 0.0, max: 300.0 }),
        (Nutrient::Sugar, Limits { min: 0.0, max: 500.0 }),
        (Nutrient::Sodium, Limits { min: 0.0, max: 300.0 }),
        (Nutrient::Protein, Limits { min: 0.0, max: 300.0 }),
        (Nutrient::SaturatedFat, Limits { min: 0.0, max: 300.0 }),
        (Nutrient::Carbohydrates, Limits { min: 0.0, max: 200.0 }),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Regex fragments joined into one case-insensitive alternation
    pub drink_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            drink_keywords: [
                "beverages",
                "cocktail",
                "drink",
                "smoothie",
                "shakes",
                "punch",
                "lemonade",
                "liqueur",
                "non-alcoholic",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Substring marking a recipe as "health" labelled
    pub health_keyword: String,
    pub min_recipes_per_tag: usize,
    pub top_n: usize,
    /// category -> tags of interest
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Default for TagConfig {
    fn default() -> Self {
        let categories = [
            ("course", &["main-dish", "desserts", "side-dishes", "appetizers", "breakfast", "lunch", "snacks", "salads", "soups-stews", "beverages"][..]),
            ("cuisine", &["italian", "mexican", "asian", "american", "european", "french", "indian"][..]),
            ("diet", &["vegetarian", "vegan", "low-fat", "low-carb", "low-sodium", "low-cholesterol", "healthy", "gluten-free", "low-calorie"][..]),
            ("difficulty", &["easy", "3-steps-or-less", "5-ingredients-or-less", "beginner-cook", "for-1-or-2"][..]),
            ("time", &["15-minutes-or-less", "30-minutes-or-less", "60-minutes-or-less", "4-hours-or-less", "1-day-or-more", "time-to-make"][..]),
        ]
        .iter()
        .map(|(name, tags)| (name.to_string(), tags.iter().map(|t| t.to_string()).collect()))
        .collect();

        Self {
            health_keyword: "health".to_string(),
            min_recipes_per_tag: 50,
            top_n: 20,
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityConfig {
    /// Rows above this quantile of each feature are trimmed
    pub quantile: f64,
    pub histogram_bins: usize,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            quantile: 0.99,
            histogram_bins: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientConfig {
    pub min_count: u64,
    pub max_count: Option<u64>,
    pub top_n: usize,
    pub neighbours_k: usize,
    pub min_co: u64,
    /// Ingredients present in more than this share of recipes are ignored per continent
    pub ubiquity_threshold: f64,
    pub continent_top_n: usize,
    /// continent -> cuisine tags
    pub continents: BTreeMap<String, Vec<String>>,
}

impl Default for IngredientConfig {
    fn default() -> Self {
        let continents = [
            ("Africa", &["african", "moroccan", "egyptian", "south-african", "ethiopian", "nigerian"][..]),
            ("Asia", &["asian", "chinese", "japanese", "indian", "thai", "korean", "vietnamese", "indonesian", "filipino"][..]),
            ("Europe", &["european", "italian", "french", "greek", "german", "spanish", "english", "irish", "scandinavian", "russian"][..]),
            ("Middle East", &["middle-eastern", "lebanese", "turkish", "iranian-persian", "israeli"][..]),
            ("North America", &["american", "canadian", "mexican", "southern-united-states", "cajun", "tex-mex"][..]),
            ("Oceania", &["australian", "new-zealand", "hawaiian"][..]),
            ("South America", &["south-american", "brazilian", "argentine", "peruvian", "colombian", "chilean"][..]),
        ]
        .iter()
        .map(|(name, tags)| (name.to_string(), tags.iter().map(|t| t.to_string()).collect()))
        .collect();

        Self {
            min_count: 200,
            max_count: Some(5000),
            top_n: 30,
            neighbours_k: 15,
            min_co: 20,
            ubiquity_threshold: 0.30,
            continent_top_n: 10,
            continents,
        }
    }
}

impl AppConfig {
    /// Resolve, read and validate the configuration
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            debug!("Rebasing data paths on {}", dir);
            config.data.rebase(Path::new(&dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (nutrient, cuts) in &self.nutriscore.thresholds {
            if cuts.is_empty() {
                return Err(ConfigError::Invalid(format!("thresholds for {} are empty", nutrient)));
            }
            if cuts.windows(2).any(|w| w[0] > w[1]) {
                return Err(ConfigError::Invalid(format!(
                    "thresholds for {} must be ascending",
                    nutrient
                )));
            }
        }

        let mut bands = self.nutriscore.grades.clone();
        if bands.is_empty() {
            return Err(ConfigError::Invalid("no grade bands configured".into()));
        }
        bands.sort_by_key(|b| b.low);
        for band in &bands {
            if band.low > band.high {
                return Err(ConfigError::Invalid(format!(
                    "grade band {} has low {} above high {}",
                    band.grade, band.low, band.high
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].low <= pair[0].high {
                return Err(ConfigError::Invalid(format!(
                    "grade bands {} and {} overlap",
                    pair[0].grade, pair[1].grade
                )));
            }
        }

        for (nutrient, limits) in &self.nutrition_limits {
            if limits.min > limits.max {
                return Err(ConfigError::Invalid(format!("limits for {} are inverted", nutrient)));
            }
        }

        if !(0.0..=1.0).contains(&self.complexity.quantile) {
            return Err(ConfigError::Invalid("complexity.quantile must be within [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.ingredients.ubiquity_threshold) {
            return Err(ConfigError::Invalid(
                "ingredients.ubiquity_threshold must be within [0, 1]".into(),
            ));
        }

        DrinkClassifier::new(&self.classifier.drink_keywords)
            .map_err(|e| ConfigError::Invalid(format!("drink keywords: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.nutriscore.grades.len(), 5);
        assert_eq!(config.nutrition_limits.len(), 7);
        assert!(config.classifier.drink_keywords.contains(&"cocktail".to_string()));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [classifier]
            drink_keywords = ["tea", "juice"]

            [complexity]
            quantile = 0.95
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.drink_keywords, vec!["tea", "juice"]);
        assert_eq!(config.complexity.quantile, 0.95);
        assert_eq!(config.complexity.histogram_bins, 30);
        assert_eq!(config.tags.health_keyword, "health");
    }

    #[test]
    fn test_thresholds_and_bands_parse() {
        let config = AppConfig::from_toml_str(
            r#"
            [nutriscore.thresholds]
            sugar = [1.0, 2.0]
            protein = [5.0]

            [[nutriscore.grades]]
            low = 0
            high = 1
            grade = "A"

            [[nutriscore.grades]]
            low = 2
            high = 9
            grade = "E"

            [nutrition_limits.calories]
            min = 10.0
            max = 900.0
            "#,
        )
        .unwrap();
        assert_eq!(config.nutriscore.thresholds[&Nutrient::Sugar], vec![1.0, 2.0]);
        assert_eq!(config.nutriscore.grades[1].grade, Grade::E);
        assert_eq!(config.nutrition_limits.len(), 1);
        assert_eq!(config.nutrition_limits[&Nutrient::Calories].max, 900.0);
    }

    #[test]
    fn test_nutrient_aliases_match_tool_names() {
        let config = AppConfig::from_toml_str(
            r#"
            [nutriscore.thresholds]
            total_fat = [3.0, 6.0]

            [nutrition_limits]
            carbs = { min = 0.0, max = 50.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.nutriscore.thresholds[&Nutrient::Fat], vec![3.0, 6.0]);
        assert_eq!(config.nutrition_limits[&Nutrient::Carbohydrates].max, 50.0);
        for name in ["total_fat", "carbs"] {
            let parsed: Nutrient = name.parse().unwrap();
            let key = format!("[nutrition_limits]\n{} = {{ min = 0.0, max = 1.0 }}\n", name);
            let config = AppConfig::from_toml_str(&key).unwrap();
            assert!(config.nutrition_limits.contains_key(&parsed));
        }
    }

    #[test]
    fn test_descending_thresholds_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [nutriscore.thresholds]
            fat = [10.0, 5.0]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [[nutriscore.grades]]
            low = 0
            high = 5
            grade = "A"

            [[nutriscore.grades]]
            low = 5
            high = 9
            grade = "B"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_keyword_regex_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [classifier]
            drink_keywords = ["(unclosed"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("drink keywords"));
    }

    #[test]
    fn test_unknown_nutrient_key_is_parse_error() {
        let err = AppConfig::from_toml_str(
            r#"
            [nutriscore.thresholds]
            fiber = [1.0]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rebase_only_touches_relative_paths() {
        let mut data = DataConfig {
            recipes_csv: PathBuf::from("/abs/recipes.csv"),
            ..DataConfig::default()
        };
        data.rebase(Path::new("/srv"));
        assert_eq!(data.recipes_csv, PathBuf::from("/abs/recipes.csv"));
        assert_eq!(data.jaccard_csv, PathBuf::from("/srv/artifacts/jaccard.csv"));
    }
}
