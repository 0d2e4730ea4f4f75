//! Recipe data model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Meal a recipe is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }

    pub fn all() -> [MealType; 3] {
        [MealType::Breakfast, MealType::Lunch, MealType::Dinner]
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(Error::Validation(format!("unknown meal type '{}'", other))),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How demanding a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::Validation(format!("unknown difficulty '{}'", other))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary flags a recipe can carry and a query can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryFlag {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    LowCarb,
    Keto,
}

impl DietaryFlag {
    /// Field name used in `dietary_info`
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryFlag::Vegetarian => "vegetarian",
            DietaryFlag::Vegan => "vegan",
            DietaryFlag::GlutenFree => "gluten_free",
            DietaryFlag::DairyFree => "dairy_free",
            DietaryFlag::NutFree => "nut_free",
            DietaryFlag::LowCarb => "low_carb",
            DietaryFlag::Keto => "keto",
        }
    }

    /// Hyphenated form shown to users and used as a tag
    pub fn label(&self) -> &'static str {
        match self {
            DietaryFlag::Vegetarian => "vegetarian",
            DietaryFlag::Vegan => "vegan",
            DietaryFlag::GlutenFree => "gluten-free",
            DietaryFlag::DairyFree => "dairy-free",
            DietaryFlag::NutFree => "nut-free",
            DietaryFlag::LowCarb => "low-carb",
            DietaryFlag::Keto => "keto",
        }
    }

    pub fn all() -> [DietaryFlag; 7] {
        [
            DietaryFlag::Vegetarian,
            DietaryFlag::Vegan,
            DietaryFlag::GlutenFree,
            DietaryFlag::DairyFree,
            DietaryFlag::NutFree,
            DietaryFlag::LowCarb,
            DietaryFlag::Keto,
        ]
    }
}

impl FromStr for DietaryFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        DietaryFlag::all()
            .into_iter()
            .find(|flag| flag.as_str() == normalized)
            .ok_or_else(|| Error::Validation(format!("unknown dietary restriction '{}'", s.trim())))
    }
}

impl fmt::Display for DietaryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dietary flags of a recipe; an absent flag reads as false
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryInfo {
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub dairy_free: bool,
    #[serde(default)]
    pub nut_free: bool,
    #[serde(default)]
    pub low_carb: bool,
    #[serde(default)]
    pub keto: bool,
}

impl DietaryInfo {
    pub fn get(&self, flag: DietaryFlag) -> bool {
        match flag {
            DietaryFlag::Vegetarian => self.vegetarian,
            DietaryFlag::Vegan => self.vegan,
            DietaryFlag::GlutenFree => self.gluten_free,
            DietaryFlag::DairyFree => self.dairy_free,
            DietaryFlag::NutFree => self.nut_free,
            DietaryFlag::LowCarb => self.low_carb,
            DietaryFlag::Keto => self.keto,
        }
    }

    pub fn set(&mut self, flag: DietaryFlag, value: bool) {
        match flag {
            DietaryFlag::Vegetarian => self.vegetarian = value,
            DietaryFlag::Vegan => self.vegan = value,
            DietaryFlag::GlutenFree => self.gluten_free = value,
            DietaryFlag::DairyFree => self.dairy_free = value,
            DietaryFlag::NutFree => self.nut_free = value,
            DietaryFlag::LowCarb => self.low_carb = value,
            DietaryFlag::Keto => self.keto = value,
        }
    }

    /// True when every requested flag is set
    pub fn satisfies_all<'a, I>(&self, restrictions: I) -> bool
    where
        I: IntoIterator<Item = &'a DietaryFlag>,
    {
        restrictions.into_iter().all(|flag| self.get(*flag))
    }

    /// Flags that are set, in declaration order
    pub fn enabled(&self) -> Vec<DietaryFlag> {
        DietaryFlag::all()
            .into_iter()
            .filter(|flag| self.get(*flag))
            .collect()
    }
}

/// Content shared by stored and generated recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeBody {
    pub name: String,
    pub cuisine: String,
    pub meal_type: MealType,
    pub difficulty: Difficulty,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl RecipeBody {
    /// Prep plus cook minutes, saturating at `u32::MAX`
    pub fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }
}

/// A recipe from the static collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u32,
    #[serde(flatten)]
    pub body: RecipeBody,
}

/// Where a generated result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Ai => f.write_str("ai"),
            Source::Fallback => f.write_str("fallback"),
        }
    }
}

/// A recipe synthesized or adapted at request time; it has no store id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    #[serde(flatten)]
    pub body: RecipeBody,
    pub source: Source,
    /// Store id of the recipe this one was adapted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<u32>,
}

/// Cooking tips for a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingTips {
    pub tips: Vec<String>,
    pub source: Source,
}
