use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use savor_cli::{ui, RecipeAssistant, Recommendation};
use savor_core::query::normalize_ingredients;
use savor_core::{Error, LLMProvider, PreferenceInput, PreferenceQuery, RecipeStore};
use savor_gemini::GeminiClient;

#[derive(Parser)]
#[command(name = "savor", version)]
#[command(about = "Recipe recommendations and AI-assisted recipe generation", long_about = None)]
struct Cli {
    /// Recipe dataset, a JSON array of recipes
    #[arg(long, global = true, env = "SAVOR_RECIPES", default_value = "recipes.json")]
    recipes: PathBuf,

    /// Log pipeline decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank stored recipes against your preferences
    Recommend {
        #[command(flatten)]
        preferences: PreferenceArgs,

        /// Number of recipes to show
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Also generate a recipe from your ingredients and rank it with the rest
        #[arg(long)]
        generate: bool,
    },
    /// Show a stored recipe
    Show {
        /// Recipe id
        id: u32,
    },
    /// Create a new recipe
    Generate {
        #[command(flatten)]
        preferences: PreferenceArgs,
    },
    /// Adapt a stored recipe to the ingredients you have
    Adapt {
        /// Recipe id
        id: u32,

        /// Ingredients on hand; repeat or comma-separate
        #[arg(long, value_delimiter = ',')]
        have: Vec<String>,

        /// Explicit substitution, e.g. --sub butter=olive oil
        #[arg(long = "sub", value_parser = parse_substitution)]
        substitutions: Vec<(String, String)>,
    },
    /// Cooking tips for a stored recipe
    Tips {
        /// Recipe id
        id: u32,
    },
    /// Report whether AI generation is available
    Status,
}

#[derive(Args, Debug, Default)]
struct PreferenceArgs {
    #[arg(long)]
    cuisine: Option<String>,

    /// Breakfast, Lunch or Dinner
    #[arg(long = "meal")]
    meal_type: Option<String>,

    /// Easy, Medium or Hard
    #[arg(long)]
    difficulty: Option<String>,

    /// Dietary restriction (vegan, gluten-free, ...); repeat or comma-separate
    #[arg(long = "diet", value_delimiter = ',')]
    diets: Vec<String>,

    /// Ingredients on hand; repeat or comma-separate
    #[arg(long, value_delimiter = ',')]
    have: Vec<String>,
}

impl PreferenceArgs {
    fn into_query(self) -> savor_core::Result<PreferenceQuery> {
        PreferenceQuery::try_from(PreferenceInput {
            cuisine: self.cuisine,
            meal_type: self.meal_type,
            difficulty: self.difficulty,
            dietary_restrictions: self.diets,
            available_ingredients: self.have,
        })
    }
}

fn parse_substitution(raw: &str) -> std::result::Result<(String, String), String> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected OLD=NEW, got '{}'", raw))?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(format!("both sides of '{}' must be non-empty", raw));
    }
    Ok((from.to_string(), to.to_string()))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_store(path: &Path) -> Result<RecipeStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read recipe dataset {}", path.display()))?;
    let store = RecipeStore::from_json_str(&raw)
        .with_context(|| format!("invalid recipe dataset {}", path.display()))?;
    debug!(recipes = store.len(), path = %path.display(), "loaded recipe dataset");
    Ok(store)
}

/// Gemini when a key is configured, otherwise offline fallback only
fn build_assistant(store: RecipeStore) -> RecipeAssistant<GeminiClient> {
    match GeminiClient::from_env() {
        Ok(client) => {
            info!(model = client.model_id(), "AI generation enabled");
            let timeout = client.timeout();
            RecipeAssistant::with_llm(store, client).with_timeout(timeout)
        }
        Err(err) => {
            info!(reason = %err, "AI generation disabled, using offline templates");
            RecipeAssistant::new(store)
        }
    }
}

/// JSON shape of `recommend --generate`
#[derive(Serialize)]
struct RecommendationReport<'a> {
    recommendations: &'a [Recommendation<'a>],
    generated_included: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = load_store(&cli.recipes)?;
    let assistant = build_assistant(store);

    match cli.command {
        Commands::Recommend {
            preferences,
            top,
            generate: false,
        } => {
            let query = preferences.into_query()?;
            let results = assistant.recommend(&query, top);
            if cli.json {
                print_json(&results)?;
            } else {
                ui::print_scored(&results);
            }
        }
        Commands::Recommend {
            preferences,
            top,
            generate: true,
        } => {
            let query = preferences.into_query()?;
            if !cli.json && !query.available_ingredients.is_empty() {
                println!("{} Creating a recipe from your ingredients...", "🍳".yellow());
            }
            let results = assistant.recommend_with_generated(&query, top).await;
            if cli.json {
                print_json(&RecommendationReport {
                    generated_included: results.iter().any(Recommendation::is_generated),
                    recommendations: &results,
                })?;
            } else {
                ui::print_recommendations(&results);
            }
        }
        Commands::Show { id } => match assistant.store().get(id) {
            Some(recipe) if cli.json => print_json(recipe)?,
            Some(recipe) => ui::print_recipe(&recipe.body),
            None => {
                ui::print_error("Recipe not found.");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Generate { preferences } => {
            let query = preferences.into_query()?;
            if !cli.json {
                println!("{} Creating a recipe...", "🍳".yellow());
            }
            let recipe = assistant.generate(&query).await;
            if cli.json {
                print_json(&recipe)?;
            } else {
                ui::print_generated(&recipe);
            }
        }
        Commands::Adapt {
            id,
            have,
            substitutions,
        } => {
            let have: Vec<String> = normalize_ingredients(&have).into_iter().collect();
            let substitutions: BTreeMap<String, String> = substitutions.into_iter().collect();

            match assistant.adapt(id, &have, &substitutions).await {
                Ok(recipe) if cli.json => print_json(&recipe)?,
                Ok(recipe) => ui::print_generated(&recipe),
                Err(Error::NotFound(_)) => {
                    ui::print_error("Recipe not found.");
                    return Ok(ExitCode::FAILURE);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Tips { id } => match assistant.tips(id).await {
            Ok(tips) if cli.json => print_json(&tips)?,
            Ok(tips) => ui::print_tips(&tips),
            Err(Error::NotFound(_)) => {
                ui::print_error("Recipe not found.");
                return Ok(ExitCode::FAILURE);
            }
            Err(err) => return Err(err.into()),
        },
        Commands::Status => {
            let status = assistant.status();
            if cli.json {
                print_json(&status)?;
            } else {
                ui::print_status(&status);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
