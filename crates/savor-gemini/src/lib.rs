//! Google Gemini integration for Savor
//!
//! This crate provides the Gemini implementation of the LLMProvider trait.

mod client;
mod config;


pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export core types for convenience
pub use savor_core::{Error, GenerationConfig, GenerationResult, LLMProvider, Result};
