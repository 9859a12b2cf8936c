//! MangeTaMain Library
//!
//! Exploration of a recipe dataset: Nutri-Score grading, food/drink split,
//! tag statistics, ingredient co-occurrence and recipe complexity.

pub mod analysis;
pub mod build_info;
pub mod config;
pub mod data;
pub mod mcp;
pub mod models;
pub mod tools;
