//! Turning raw model output into recipes and tips
//!
//! Models wrap their answers in prose and code fences, drop fields, and write
//! numbers as strings. All of that tolerance lives here, behind
//! [`parse_recipe_json`] and [`parse_tips_text`].

use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

use savor_core::{
    DietaryInfo, Difficulty, Error, GeneratedRecipe, MealType, RecipeBody, Result, Source,
};

const DEFAULT_CUISINE: &str = "International";
const DEFAULT_SERVINGS: u32 = 4;

/// Recipe fields as a model may send them
#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cuisine: Option<String>,
    #[serde(default)]
    meal_type: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    prep_time: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    cook_time: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    servings: Option<u32>,
    #[serde(default)]
    ingredients: Option<Vec<String>>,
    #[serde(default)]
    steps: Option<Vec<String>>,
    #[serde(default)]
    dietary_info: Option<DietaryInfo>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Accepts `15`, `15.0`, `"15"` and `"15 minutes"`; anything else, including
/// values past `u32::MAX`, reads as absent
fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        }
        _ => None,
    };

    Ok(parsed.and_then(|n| u32::try_from(n).ok()))
}

/// Locate the JSON object embedded in `raw`
///
/// Starts at the first `{` and tries each `}` from the last one backwards,
/// returning the first slice that parses as a JSON object.
pub fn extract_json_object(raw: &str) -> Result<Value> {
    let start = raw
        .find('{')
        .ok_or_else(|| Error::Parse("no JSON object in model output".to_string()))?;

    let candidate = &raw[start..];
    for (end, _) in candidate.rmatch_indices('}') {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&candidate[..=end]) {
            return Ok(value);
        }
    }

    Err(Error::Parse(
        "no balanced, valid JSON object in model output".to_string(),
    ))
}

/// Parse a recipe out of model output, defaulting optional fields
///
/// Fails when no JSON object is found or when `name`, `ingredients` or
/// `steps` are missing or empty. The result is tagged `Source::Ai`.
pub fn parse_recipe_json(raw: &str) -> Result<GeneratedRecipe> {
    let value = extract_json_object(raw)?;
    let recipe: RawRecipe = serde_json::from_value(value)
        .map_err(|e| Error::Parse(format!("recipe JSON has unexpected shape: {}", e)))?;

    let name = recipe
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::Parse("recipe is missing a name".to_string()))?;
    let ingredients = required_list(recipe.ingredients, "ingredients")?;
    let steps = required_list(recipe.steps, "steps")?;

    let meal_type = recipe
        .meal_type
        .and_then(|m| m.parse::<MealType>().ok())
        .unwrap_or(MealType::Dinner);
    let difficulty = recipe
        .difficulty
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or(Difficulty::Easy);
    let cuisine = recipe
        .cuisine
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CUISINE.to_string());

    let tags: BTreeSet<String> = recipe
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(GeneratedRecipe {
        body: RecipeBody {
            name,
            cuisine,
            meal_type,
            difficulty,
            prep_time: recipe.prep_time.unwrap_or(0),
            cook_time: recipe.cook_time.unwrap_or(0),
            servings: recipe.servings.filter(|s| *s > 0).unwrap_or(DEFAULT_SERVINGS),
            ingredients,
            steps,
            dietary_info: recipe.dietary_info.unwrap_or_default(),
            tags,
        },
        source: Source::Ai,
        based_on: None,
    })
}

fn required_list(list: Option<Vec<String>>, field: &str) -> Result<Vec<String>> {
    let items: Vec<String> = list
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(Error::Parse(format!("recipe is missing {}", field)));
    }
    Ok(items)
}

/// Split model output into individual tips
///
/// Accepts a JSON array of strings or plain lines; strips code fences,
/// bullets, `1.` / `1)` numbering and lead-in lines ending in a colon.
/// Fails only when nothing is left.
pub fn parse_tips_text(raw: &str) -> Result<Vec<String>> {
    if let Some(tips) = json_string_array(raw) {
        if !tips.is_empty() {
            return Ok(tips);
        }
    }

    let tips: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("```"))
        .map(strip_list_marker)
        .map(|line| line.trim_matches(|c: char| c == '"' || c == ',').trim().to_string())
        .filter(|line| !line.is_empty() && line != "[" && line != "]")
        // "Here are some tips:" style introductions
        .filter(|line| !line.ends_with(':'))
        .collect();

    if tips.is_empty() {
        return Err(Error::Parse("no tips in model output".to_string()));
    }
    Ok(tips)
}

fn json_string_array(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }

    let items: Vec<String> = serde_json::from_str(&raw[start..=end]).ok()?;
    Some(
        items
            .into_iter()
            .map(|tip| tip.trim().to_string())
            .filter(|tip| !tip.is_empty())
            .collect(),
    )
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(['-', '*', '•']).trim_start();

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim_start();
        }
    }
    line
}
