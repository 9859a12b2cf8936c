//! Recipe CSV loading

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use super::literal::{parse_number_list, parse_string_list};
use super::{DataError, DataResult};
use crate::models::{Nutrition, Recipe};

pub const COL_ID: &str = "id";
pub const COL_NAME: &str = "name";
pub const COL_MINUTES: &str = "minutes";
pub const COL_N_STEPS: &str = "n_steps";
pub const COL_N_INGREDIENTS: &str = "n_ingredients";
pub const COL_TAGS: &str = "tags";
pub const COL_INGREDIENTS: &str = "ingredients";
pub const COL_NUTRITION: &str = "nutrition";

const REQUIRED: [&str; 7] = [
    COL_ID,
    COL_MINUTES,
    COL_N_STEPS,
    COL_N_INGREDIENTS,
    COL_TAGS,
    COL_INGREDIENTS,
    COL_NUTRITION,
];

/// Read a CSV with every column as a string
pub(crate) fn read_csv_as_strings(path: &Path) -> DataResult<DataFrame> {
    if !path.exists() {
        return Err(DataError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

pub fn load_recipes(path: &Path) -> DataResult<Vec<Recipe>> {
    info!("Loading recipes from {:?}", path);
    let df = read_csv_as_strings(path)?;
    let recipes = recipes_from_frame(&df)?;
    info!("Loaded {} recipes", recipes.len());
    Ok(recipes)
}

/// Integers may be written as floats ("12.0"); nan and inf are rejected
fn parse_int(raw: Option<&str>, row: usize, column: &str) -> DataResult<i64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
                .map(|v| v as i64)
        })
        .ok_or_else(|| DataError::Parse {
            row,
            column: column.to_string(),
            message: format!("invalid integer '{}'", raw),
        })
}

pub fn recipes_from_frame(df: &DataFrame) -> DataResult<Vec<Recipe>> {
    for name in REQUIRED {
        if df.column(name).is_err() {
            return Err(DataError::MissingColumn(name.to_string()));
        }
    }

    let ids = df.column(COL_ID)?.str()?;
    let minutes = df.column(COL_MINUTES)?.str()?;
    let steps = df.column(COL_N_STEPS)?.str()?;
    let n_ingredients = df.column(COL_N_INGREDIENTS)?.str()?;
    let tags = df.column(COL_TAGS)?.str()?;
    let ingredients = df.column(COL_INGREDIENTS)?.str()?;
    let nutrition = df.column(COL_NUTRITION)?.str()?;
    let names = match df.column(COL_NAME) {
        Ok(c) => Some(c.str()?),
        Err(_) => None,
    };

    let list_err = |row: usize, column: &str| {
        let column = column.to_string();
        move |message: String| DataError::Parse { row, column, message }
    };

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let nutrition_values =
            parse_number_list(nutrition.get(i).unwrap_or_default()).map_err(list_err(i, COL_NUTRITION))?;
        let nutrition = Nutrition::from_slice(&nutrition_values).ok_or_else(|| DataError::Parse {
            row: i,
            column: COL_NUTRITION.to_string(),
            message: format!("expected 7 values, got {}", nutrition_values.len()),
        })?;

        out.push(Recipe {
            id: parse_int(ids.get(i), i, COL_ID)?,
            name: names.and_then(|n| n.get(i)).unwrap_or_default().trim().to_string(),
            minutes: parse_int(minutes.get(i), i, COL_MINUTES)?,
            n_steps: parse_int(steps.get(i), i, COL_N_STEPS)?,
            n_ingredients: parse_int(n_ingredients.get(i), i, COL_N_INGREDIENTS)?,
            tags: parse_string_list(tags.get(i).unwrap_or_default()).map_err(list_err(i, COL_TAGS))?,
            ingredients: parse_string_list(ingredients.get(i).unwrap_or_default())
                .map_err(list_err(i, COL_INGREDIENTS))?,
            nutrition,
        });
    }
    debug!("Parsed {} recipe rows", out.len());
    Ok(out)
}
