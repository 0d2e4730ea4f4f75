//! Terminal rendering for recipes, rankings and tips

use colored::*;
use std::fmt::Write;

use savor_core::scorer::ScoredRecipe;
use savor_core::{CookingTips, GeneratedRecipe, RecipeBody, Source};

use crate::assistant::{AssistantStatus, Recommendation};

fn source_badge(source: Source) -> ColoredString {
    match source {
        Source::Ai => "✨ AI generated".magenta().bold(),
        Source::Fallback => "📖 Offline template".cyan().bold(),
    }
}

/// Full recipe card: summary line, ingredients, numbered steps
pub fn render_recipe(body: &RecipeBody) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", body.name.green().bold());
    let _ = writeln!(
        out,
        "{} · {} · {} · {} min ({} prep + {} cook) · serves {}",
        body.cuisine,
        body.meal_type,
        body.difficulty,
        body.total_time(),
        body.prep_time,
        body.cook_time,
        body.servings
    );

    let diets: Vec<&str> = body.dietary_info.enabled().iter().map(|f| f.label()).collect();
    if !diets.is_empty() {
        let _ = writeln!(out, "{} {}", "Diet:".dimmed(), diets.join(", "));
    }
    if !body.tags.is_empty() {
        let tags: Vec<&str> = body.tags.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{} {}", "Tags:".dimmed(), tags.join(", "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Ingredients".bold());
    for ingredient in &body.ingredients {
        let _ = writeln!(out, "  • {}", ingredient);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Steps".bold());
    for (i, step) in body.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    out
}

pub fn render_generated(recipe: &GeneratedRecipe) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", source_badge(recipe.source));
    if let Some(id) = recipe.based_on {
        let _ = write!(out, " {}", format!("(adapted from recipe #{})", id).dimmed());
    }
    let _ = writeln!(out);
    out.push_str(&render_recipe(&recipe.body));
    out
}

/// Two lines per ranked entry: name and score, then the breakdown
fn write_ranked(
    out: &mut String,
    rank: usize,
    body: &RecipeBody,
    label: ColoredString,
    score: f64,
    ingredient_match: Option<f64>,
    preference_match: f64,
) {
    let _ = writeln!(
        out,
        "{}. {} {} {}",
        rank,
        body.name.green().bold(),
        label,
        format!("score {:.2}", score).yellow()
    );

    let ingredients = ingredient_match
        .map(|m| format!("ingredients {:.0}%", m * 100.0))
        .unwrap_or_else(|| "ingredients n/a".to_string());
    let _ = writeln!(
        out,
        "   {} · {} · {} · {} min · {} · preferences {:.0}%",
        body.cuisine,
        body.meal_type,
        body.difficulty,
        body.total_time(),
        ingredients,
        preference_match * 100.0
    );
}

/// Ranked list, one line per recipe plus its score breakdown
pub fn render_scored(results: &[ScoredRecipe<'_>]) -> String {
    if results.is_empty() {
        return format!("{}\n", "No matching recipes found.".yellow());
    }

    let mut out = String::new();
    for (rank, scored) in results.iter().enumerate() {
        write_ranked(
            &mut out,
            rank + 1,
            &scored.recipe.body,
            format!("#{}", scored.recipe.id).dimmed(),
            scored.score,
            scored.ingredient_match,
            scored.preference_match,
        );
    }
    out
}

/// Ranking that may include a generated recipe, followed by its steps
pub fn render_recommendations(results: &[Recommendation<'_>]) -> String {
    if results.is_empty() {
        return format!("{}\n", "No matching recipes found.".yellow());
    }

    let mut out = String::new();
    for (rank, entry) in results.iter().enumerate() {
        match entry {
            Recommendation::Stored(scored) => write_ranked(
                &mut out,
                rank + 1,
                &scored.recipe.body,
                format!("#{}", scored.recipe.id).dimmed(),
                scored.score,
                scored.ingredient_match,
                scored.preference_match,
            ),
            Recommendation::Generated(generated) => write_ranked(
                &mut out,
                rank + 1,
                &generated.recipe.body,
                source_badge(generated.recipe.source),
                generated.score.score,
                generated.score.ingredient_match,
                generated.score.preference_match,
            ),
        }
    }

    if let Some(Recommendation::Generated(generated)) = results.iter().find(|r| r.is_generated()) {
        let _ = writeln!(out);
        out.push_str(&render_generated(&generated.recipe));
    }
    out
}

pub fn render_status(status: &AssistantStatus) -> String {
    let mut out = String::new();
    let ai = if status.has_llm {
        status.message.green()
    } else {
        status.message.yellow()
    };
    let _ = writeln!(out, "{} {}", "AI:".bold(), ai);
    let _ = writeln!(
        out,
        "{} {}",
        "Fallback:".bold(),
        if status.fallback_available { "available" } else { "unavailable" }
    );
    let _ = writeln!(out, "{} {}", "Recipes:".bold(), status.recipes);
    out
}

pub fn render_tips(tips: &CookingTips) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "💡 Cooking tips".bold(), source_badge(tips.source));
    for (i, tip) in tips.tips.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, tip);
    }
    out
}

pub fn print_recipe(body: &RecipeBody) {
    print!("{}", render_recipe(body));
}

pub fn print_generated(recipe: &GeneratedRecipe) {
    print!("{}", render_generated(recipe));
}

pub fn print_scored(results: &[ScoredRecipe<'_>]) {
    print!("{}", render_scored(results));
}

pub fn print_recommendations(results: &[Recommendation<'_>]) {
    print!("{}", render_recommendations(results));
}

pub fn print_status(status: &AssistantStatus) {
    print!("{}", render_status(status));
}

pub fn print_tips(tips: &CookingTips) {
    print!("{}", render_tips(tips));
}

/// Error line for failures that reach the user
pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}
