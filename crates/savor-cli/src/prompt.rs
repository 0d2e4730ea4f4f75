//! Prompt construction for recipe generation, adaptation and tips
//!
//! Every builder is a pure function of its input: the same input always
//! yields the same prompt text.

use std::collections::BTreeMap;

use savor_core::{PreferenceQuery, Recipe, Result};

/// JSON shape the model is asked to answer with
const RECIPE_SHAPE: &str = r#"{
  "name": "Recipe Name",
  "cuisine": "Cuisine type",
  "meal_type": "Breakfast | Lunch | Dinner",
  "difficulty": "Easy | Medium | Hard",
  "prep_time": 15,
  "cook_time": 20,
  "servings": 4,
  "ingredients": ["ingredient 1", "ingredient 2"],
  "steps": ["Step 1", "Step 2"],
  "dietary_info": {
    "vegetarian": true,
    "vegan": false,
    "gluten_free": false,
    "dairy_free": false,
    "nut_free": true,
    "low_carb": false,
    "keto": false
  },
  "tags": ["tag1", "tag2"]
}"#;

/// Ingredients listed in the tips prompt
const TIPS_INGREDIENT_LIMIT: usize = 10;

fn join_or(items: impl IntoIterator<Item = impl AsRef<str>>, empty: &str) -> String {
    let joined = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { empty.to_string() } else { joined }
}

/// Prompt asking for a brand new recipe as strict JSON
pub fn build_generate_prompt(query: &PreferenceQuery) -> String {
    let cuisine = query.cuisine.as_deref().unwrap_or("Any");
    let meal_type = query.meal_type.map(|m| m.as_str()).unwrap_or("Any");
    let difficulty = query.difficulty.map(|d| d.as_str()).unwrap_or("Any");
    let restrictions = join_or(query.dietary_restrictions.iter().map(|f| f.label()), "none");
    let ingredients = join_or(&query.available_ingredients, "use common pantry items");

    format!(
        "You are an expert chef and recipe developer. Create one original recipe.\n\
        \n\
        Specifications:\n\
        - Cuisine: {cuisine}\n\
        - Meal Type: {meal_type}\n\
        - Difficulty: {difficulty}\n\
        - Dietary Restrictions: {restrictions}\n\
        - Available Ingredients: {ingredients}\n\
        \n\
        Use the available ingredients wherever possible. Every dietary restriction is mandatory: \
        do not include any ingredient that violates one, and set the matching dietary_info flags to true.\n\
        \n\
        IMPORTANT: Return ONLY a valid JSON object with exactly this structure, no additional text:\n\
        {RECIPE_SHAPE}"
    )
}

/// Prompt asking for an adaptation of `recipe` to what the user has
pub fn build_adapt_prompt(
    recipe: &Recipe,
    available_ingredients: &[String],
    substitutions: &BTreeMap<String, String>,
) -> Result<String> {
    let recipe_text = serde_json::to_string_pretty(&recipe.body)?;
    let ingredients = join_or(available_ingredients, "use what's available");
    let substitutions = join_or(
        substitutions
            .iter()
            .map(|(from, to)| format!("{} -> {}", from, to)),
        "none",
    );
    let step_count = recipe.body.steps.len();

    Ok(format!(
        "You are an expert chef. Adapt the following recipe to the ingredients the cook has.\n\
        \n\
        Available Ingredients: {ingredients}\n\
        Substitutions: {substitutions}\n\
        \n\
        Original Recipe:\n\
        {recipe_text}\n\
        \n\
        Replace ingredients that are not available with sensible substitutes, apply the listed \
        substitutions, and rewrite any step that mentions a replaced ingredient. Keep the recipe \
        recognisably the same dish, keep its name where feasible, and keep exactly {step_count} steps.\n\
        \n\
        IMPORTANT: Return ONLY the adapted recipe as a valid JSON object with exactly this structure, \
        no additional text:\n\
        {RECIPE_SHAPE}"
    ))
}

/// Prompt asking for 3 to 5 plain-text technique tips
pub fn build_tips_prompt(recipe: &Recipe) -> String {
    let body = &recipe.body;
    let ingredients = join_or(body.ingredients.iter().take(TIPS_INGREDIENT_LIMIT), "not listed");

    format!(
        "You are a professional chef. Give 3 to 5 concise cooking technique tips for this recipe.\n\
        \n\
        Recipe: {name}\n\
        Cuisine: {cuisine}\n\
        Meal Type: {meal_type}\n\
        Difficulty: {difficulty}\n\
        Ingredients: {ingredients}\n\
        Cooking time: {cook_time} minutes\n\
        \n\
        Answer in plain text, not JSON: one tip per line, numbered 1., 2., 3. and so on, \
        with no introduction or closing remarks.",
        name = body.name,
        cuisine = body.cuisine,
        meal_type = body.meal_type,
        difficulty = body.difficulty,
        cook_time = body.cook_time,
    )
}
