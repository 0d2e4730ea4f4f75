//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Result;

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gemini-2.0-flash".to_string(),
            max_tokens: 2000,
            temperature: Some(0.7),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
}

/// Trait for LLM providers (e.g., Gemini)
///
/// A provider makes exactly one attempt per call. It must bound the call with
/// `config.timeout` and report failures as `ServiceUnavailable`, `Transport`
/// or `RateLimited`; retry and fallback policy belong to the caller.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Generate text using the LLM with default configuration
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.model_id().to_string(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    /// Get the model ID being used
    fn model_id(&self) -> &str;

    /// Whether a credential is present. Callers skip the network entirely when false.
    fn is_configured(&self) -> bool {
        true
    }
}
