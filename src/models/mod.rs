//! Data models
//!
//! Rust structs for the rows of the recipe dataset.

mod nutrition;
mod recipe;

pub use nutrition::{Grade, Nutrient, NutrientValues, Nutrition};
pub use recipe::Recipe;

#[cfg(test)]
pub(crate) use recipe::fixtures;
