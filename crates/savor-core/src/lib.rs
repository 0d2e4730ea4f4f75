//! Core traits and types for Savor
//!
//! This crate defines the recipe data model, the error taxonomy, the read-only
//! recipe store, the recommendation scorer, and the LLM provider interface the
//! generation layer is written against.

pub mod error;
pub mod llm;
pub mod query;
pub mod recipe;
pub mod scorer;
pub mod store;


pub use error::{Error, Result};
pub use llm::{GenerationConfig, GenerationResult, LLMProvider};
pub use query::{PreferenceInput, PreferenceQuery};
pub use recipe::{
    CookingTips, DietaryFlag, DietaryInfo, Difficulty, GeneratedRecipe, MealType, Recipe,
    RecipeBody, Source,
};
pub use scorer::{Score, ScoredRecipe};
pub use store::RecipeStore;
