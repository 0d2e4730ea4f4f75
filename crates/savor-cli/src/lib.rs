//! Recipe assistant: prompts, response parsing, offline fallback and
//! terminal rendering on top of savor-core

mod assistant;
pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod ui;

#[cfg(test)]
mod tests;

pub use assistant::{AssistantStatus, RecipeAssistant, Recommendation, ScoredGenerated};
pub use fallback::{infer_dietary_info, FallbackGenerator};
pub use parser::{extract_json_object, parse_recipe_json, parse_tips_text};
pub use prompt::{build_adapt_prompt, build_generate_prompt, build_tips_prompt};

// Re-export core types
pub use savor_core::{Error, Result};
