//! Nutrition data structures
//!
//! Food.com stores nutrition as an ordered 7-tuple. Calories are absolute,
//! every other value is a percent of daily value (PDV).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the seven nutrients of the dataset's nutrition tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    #[serde(alias = "total_fat")]
    Fat,
    Sugar,
    Sodium,
    Protein,
    SaturatedFat,
    #[serde(alias = "carbs")]
    Carbohydrates,
}

impl Nutrient {
    /// All nutrients in tuple order
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Calories,
        Nutrient::Fat,
        Nutrient::Sugar,
        Nutrient::Sodium,
        Nutrient::Protein,
        Nutrient::SaturatedFat,
        Nutrient::Carbohydrates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Fat => "fat",
            Nutrient::Sugar => "sugar",
            Nutrient::Sodium => "sodium",
            Nutrient::Protein => "protein",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::Carbohydrates => "carbohydrates",
        }
    }

    /// Protein lowers the adverse score; every other nutrient raises it
    pub fn is_favorable(&self) -> bool {
        matches!(self, Nutrient::Protein)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calories" => Ok(Nutrient::Calories),
            "fat" | "total_fat" => Ok(Nutrient::Fat),
            "sugar" => Ok(Nutrient::Sugar),
            "sodium" => Ok(Nutrient::Sodium),
            "protein" => Ok(Nutrient::Protein),
            "saturated_fat" => Ok(Nutrient::SaturatedFat),
            "carbohydrates" | "carbs" => Ok(Nutrient::Carbohydrates),
            other => Err(format!("Unknown nutrient: '{}'", other)),
        }
    }
}

/// A subset of nutrients with their values
pub type NutrientValues = BTreeMap<Nutrient, f64>;

/// Nutrition tuple of a recipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub fat: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub protein: f64,
    pub saturated_fat: f64,
    pub carbohydrates: f64,
}

impl Nutrition {
    /// Build from the dataset's 7-value list, in tuple order
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [calories, fat, sugar, sodium, protein, saturated_fat, carbohydrates] => Some(Self {
                calories: *calories,
                fat: *fat,
                sugar: *sugar,
                sodium: *sodium,
                protein: *protein,
                saturated_fat: *saturated_fat,
                carbohydrates: *carbohydrates,
            }),
            _ => None,
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Fat => self.fat,
            Nutrient::Sugar => self.sugar,
            Nutrient::Sodium => self.sodium,
            Nutrient::Protein => self.protein,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Carbohydrates => self.carbohydrates,
        }
    }

    pub fn to_values(&self) -> NutrientValues {
        Nutrient::ALL.iter().map(|n| (*n, self.get(*n))).collect()
    }
}

/// Nutri-Score letter grade, A best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            other => Err(format!("Invalid grade: '{}'. Must be one of A-E", other)),
        }
    }
}
