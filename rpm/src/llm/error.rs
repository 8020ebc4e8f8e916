//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the generation service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt blocked by the service: {0}")]
    Blocked(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether the failure came from the transport rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Network(_) | LlmError::Timeout(_))
    }

    /// Whether the service rejected the credential
    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::ApiError { status: 401 | 403, .. })
            || matches!(self, LlmError::ApiError { status: 400, message } if message.contains("API_KEY_INVALID"))
    }
}
