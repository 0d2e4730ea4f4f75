//! Gemini configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use savor_core::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration(
                    "GEMINI_API_KEY or GOOGLE_API_KEY environment variable not found".to_string(),
                )
            })?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let config = Self {
            api_key,
            model,
            api_url,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the API URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url).map_err(|e| {
            Error::Configuration(format!("invalid GEMINI_API_URL '{}': {}", self.api_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::Configuration(format!(
                "GEMINI_API_URL must use http or https, got '{}'",
                other
            ))),
        }
    }

    /// `generateContent` endpoint for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = GeminiConfig::new("key".to_string());
        config.api_url = "https://example.test/v1beta/".to_string();
        assert_eq!(
            config.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = GeminiConfig::new("key".to_string());
        assert!(config.validate().is_ok());

        config.api_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.api_url = "ftp://example.test".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
