//! Error types for Savor

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Savor recipe assistant
#[derive(Error, Debug)]
pub enum Error {
    /// No AI credential is configured, or the service rejected it
    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Network failure, timeout or unexpected status from the AI service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The AI service rejected the call because of quota
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The AI service answered with text we could not turn into a result
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed caller input, surfaced as a rejected request
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Recipe not found: {0}")]
    NotFound(u32),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a generation path may degrade to the fallback generator on this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ServiceUnavailable(_)
                | Error::Transport(_)
                | Error::RateLimited(_)
                | Error::Parse(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
