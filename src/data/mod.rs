//! Data module
//!
//! Loads the recipe table and the precomputed ingredient matrices.

mod dataset;
pub mod literal;
pub mod loader;
pub mod matrix;

use std::path::PathBuf;

use thiserror::Error;

pub use dataset::Dataset;

/// Data loading error types
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Malformed matrix: {0}")]
    Shape(String),
}

/// Result type for data operations
pub type DataResult<T> = Result<T, DataError>;
