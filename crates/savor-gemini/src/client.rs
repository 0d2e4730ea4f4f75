//! Gemini client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use savor_core::{Error, GenerationConfig, GenerationResult, LLMProvider, Result};

use crate::config::GeminiConfig;

/// Google Gemini client
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    current_model: String,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationParams,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;

        // Per-call timeouts come from GenerationConfig; this one only caps connects
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        let current_model = config.model.clone();
        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.current_model = model_id.into();
        self
    }

    /// Configured per-call timeout
    pub fn timeout(&self) -> std::time::Duration {
        self.config.timeout
    }

    /// Perform the actual generation request
    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request_body = build_request(prompt, config);

        let mut endpoint_config = self.config.clone();
        endpoint_config.model = config.model_id.clone();
        let url = endpoint_config.endpoint();

        debug!(model = %config.model_id, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%status, "Gemini responded");

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &error_text));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        extract_text(&response_text)
    }
}

fn build_request<'a>(prompt: &'a str, config: &GenerationConfig) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationParams {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        },
    }
}

/// Map a non-success status onto the client error taxonomy
fn classify_status(status: StatusCode, body: &str) -> Error {
    let message = format!("Gemini API request failed with status {}: {}", status, body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::ServiceUnavailable(message),
        _ => Error::Transport(message),
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response_text: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(response_text)
        .map_err(|e| Error::Transport(format!("malformed Gemini response: {}", e)))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

#[async_trait]
impl LLMProvider for GeminiClient {
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        if !self.is_configured() {
            return Err(Error::ServiceUnavailable("no Gemini API key configured".to_string()));
        }

        let generation_future = self.perform_generation(prompt, config);

        let text = match timeout(config.timeout, generation_future).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Transport(format!(
                    "request timed out after {}s",
                    config.timeout.as_secs()
                )))
            }
        };

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
        })
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }
}
