//! Preference queries supplied by front ends

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::recipe::{DietaryFlag, Difficulty, MealType};
use crate::Error;

/// Raw preferences as a front end collects them
///
/// Empty strings mean "no preference". Converted into a [`PreferenceQuery`]
/// with `TryFrom`, which is where validation happens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceInput {
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub available_ingredients: Vec<String>,
}

/// A validated, normalized preference query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceQuery {
    pub cuisine: Option<String>,
    pub meal_type: Option<MealType>,
    pub difficulty: Option<Difficulty>,
    pub dietary_restrictions: BTreeSet<DietaryFlag>,
    /// Lower-cased, trimmed, non-empty
    pub available_ingredients: BTreeSet<String>,
}

impl PreferenceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = non_blank(&cuisine.into());
        self
    }

    pub fn with_meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_restriction(mut self, flag: DietaryFlag) -> Self {
        self.dietary_restrictions.insert(flag);
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.available_ingredients
            .extend(normalize_ingredients(ingredients));
        self
    }
}

impl TryFrom<PreferenceInput> for PreferenceQuery {
    type Error = Error;

    fn try_from(input: PreferenceInput) -> Result<Self, Self::Error> {
        let meal_type = input
            .meal_type
            .as_deref()
            .and_then(non_blank)
            .map(|m| m.parse::<MealType>())
            .transpose()?;

        let difficulty = input
            .difficulty
            .as_deref()
            .and_then(non_blank)
            .map(|d| d.parse::<Difficulty>())
            .transpose()?;

        let dietary_restrictions = input
            .dietary_restrictions
            .iter()
            .filter(|r| !r.trim().is_empty())
            .map(|r| r.parse::<DietaryFlag>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            cuisine: input.cuisine.as_deref().and_then(non_blank),
            meal_type,
            difficulty,
            dietary_restrictions,
            available_ingredients: normalize_ingredients(&input.available_ingredients),
        })
    }
}

/// Lower-case and trim ingredient names, dropping blanks
pub fn normalize_ingredients<I, S>(ingredients: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ingredients
        .into_iter()
        .map(|i| i.as_ref().trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect()
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
