//! LLM request/response types
//!
//! A request is a single user prompt plus an optional response schema; the
//! response carries the raw text the service produced.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The user prompt (rendered from a Handlebars template)
    pub prompt: String,

    /// JSON schema the output must follow; `None` for free text
    pub response_schema: Option<serde_json::Value>,

    /// Max output tokens for the response
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Request structured JSON output following `schema`
    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::structured: called");
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            max_tokens,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text output; `None` when the service returned no text parts
    pub content: Option<String>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage statistics
    pub usage: TokenUsage,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Output hit the token limit
    MaxTokens,
    /// Stopped by a safety or content filter
    Safety,
    /// Anything else the service reports
    Other(String),
}

impl FinishReason {
    /// Map the service's finish reason string
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            None | Some("STOP") => Self::Stop,
            Some("MAX_TOKENS") => Self::MaxTokens,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => Self::Safety,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens for this call
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
