//! Relevance scoring of stored recipes against a preference query
//!
//! A recipe is first gated on the query's dietary restrictions; a recipe that
//! misses any requested flag never receives a score. Survivors get
//! `0.6 * ingredient_match + 0.4 * preference_match`, or the preference match
//! alone when the query lists no available ingredients.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::query::PreferenceQuery;
use crate::recipe::{Recipe, RecipeBody};

pub const INGREDIENT_WEIGHT: f64 = 0.6;
pub const PREFERENCE_WEIGHT: f64 = 0.4;

/// A recipe paired with its score for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecipe<'a> {
    pub recipe: &'a Recipe,
    /// In `[0, 1]`
    pub score: f64,
    /// `None` when the query supplied no ingredients
    pub ingredient_match: Option<f64>,
    pub preference_match: f64,
}

/// Score components of any recipe body, stored or generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub score: f64,
    pub ingredient_match: Option<f64>,
    pub preference_match: f64,
}

/// Score a recipe, or `None` when it fails the dietary gate
pub fn score(recipe: &Recipe, query: &PreferenceQuery) -> Option<f64> {
    score_body(&recipe.body, query).map(|parts| parts.score)
}

/// Gate and score a recipe body
pub fn score_body(body: &RecipeBody, query: &PreferenceQuery) -> Option<Score> {
    if !body.dietary_info.satisfies_all(&query.dietary_restrictions) {
        return None;
    }

    let preference_match = preference_match(body, query);
    let ingredient_match = (!query.available_ingredients.is_empty())
        .then(|| ingredient_match(&body.ingredients, &query.available_ingredients));

    let score = match ingredient_match {
        Some(ingredients) => {
            INGREDIENT_WEIGHT * ingredients + PREFERENCE_WEIGHT * preference_match
        }
        None => preference_match,
    };

    Some(Score {
        score,
        ingredient_match,
        preference_match,
    })
}

/// Score with the component breakdown
pub fn evaluate<'a>(recipe: &'a Recipe, query: &PreferenceQuery) -> Option<ScoredRecipe<'a>> {
    let parts = score_body(&recipe.body, query)?;
    Some(ScoredRecipe {
        recipe,
        score: parts.score,
        ingredient_match: parts.ingredient_match,
        preference_match: parts.preference_match,
    })
}

/// All recipes passing the dietary gate, best first; ties keep dataset order
pub fn rank<'a>(recipes: &'a [Recipe], query: &PreferenceQuery) -> Vec<ScoredRecipe<'a>> {
    let mut scored: Vec<_> = recipes
        .iter()
        .filter_map(|recipe| evaluate(recipe, query))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// The best `limit` recipes
pub fn top<'a>(
    recipes: &'a [Recipe],
    query: &PreferenceQuery,
    limit: usize,
) -> Vec<ScoredRecipe<'a>> {
    let mut ranked = rank(recipes, query);
    ranked.truncate(limit);
    ranked
}

/// Fraction of recipe ingredients covered by what the user has
pub fn ingredient_match(ingredients: &[String], available: &BTreeSet<String>) -> f64 {
    let matched = ingredients
        .iter()
        .filter(|ingredient| ingredient_matches(ingredient, available))
        .count();

    matched as f64 / ingredients.len().max(1) as f64
}

/// Case-insensitive substring match in either direction
///
/// Deliberately loose: "egg" also matches "eggplant".
pub fn ingredient_matches(ingredient: &str, available: &BTreeSet<String>) -> bool {
    let ingredient = ingredient.trim().to_lowercase();
    if ingredient.is_empty() {
        return false;
    }

    available.iter().any(|have| {
        let have = have.trim().to_lowercase();
        !have.is_empty() && (ingredient.contains(&have) || have.contains(&ingredient))
    })
}

/// Average of the cuisine, meal type and difficulty matches; unset fields count as matches
pub fn preference_match(body: &RecipeBody, query: &PreferenceQuery) -> f64 {
    let cuisine = query
        .cuisine
        .as_ref()
        .is_none_or(|cuisine| cuisine.eq_ignore_ascii_case(body.cuisine.trim()));
    let meal_type = query.meal_type.is_none_or(|meal| meal == body.meal_type);
    let difficulty = query
        .difficulty
        .is_none_or(|difficulty| difficulty == body.difficulty);

    let matched = [cuisine, meal_type, difficulty]
        .into_iter()
        .filter(|hit| *hit)
        .count();

    matched as f64 / 3.0
}
