//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait against the `generateContent` REST
//! endpoint, with structured (JSON schema) output when the request asks for it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, TokenUsage};
use crate::config::LlmConfig;

/// Google Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the configured environment variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut generation_config = serde_json::json!({
            "maxOutputTokens": max_tokens,
        });

        if let Some(schema) = &request.response_schema {
            debug!("build_request_body: structured output requested");
            generation_config["responseMimeType"] = serde_json::json!("application/json");
            generation_config["responseSchema"] = schema.clone();
        } else {
            debug!("build_request_body: free text output");
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        debug!(candidate_count = api_response.candidates.len(), "parse_response: called");

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            debug!(%reason, "parse_response: no candidate");
            return Err(LlmError::Blocked(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text)
            .collect();

        let finish_reason = FinishReason::from_api(candidate.finish_reason.as_deref());
        debug!(?finish_reason, text_len = text.len(), "parse_response: candidate parsed");

        Ok(CompletionResponse {
            content: if text.is_empty() { None } else { Some(text) },
            finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    debug!("complete: request timed out");
                    LlmError::Timeout(self.timeout)
                } else {
                    debug!(error = %e, "complete: network error");
                    LlmError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await.map_err(LlmError::Network)?;
        let api_response: GeminiResponse = serde_json::from_str(&text)?;
        let parsed = self.parse_response(api_response)?;
        info!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Gemini completion received"
        );
        Ok(parsed)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(max_tokens: u32) -> GeminiClient {
        GeminiClient {
            model: "gemini-3-flash-preview".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            http: Client::new(),
            max_tokens,
            timeout: Duration::from_secs(120),
        }
    }

    fn parse(client: &GeminiClient, json: serde_json::Value) -> Result<CompletionResponse, LlmError> {
        let api_response: GeminiResponse = serde_json::from_value(json).unwrap();
        client.parse_response(api_response)
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            test_client(8192).endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_build_request_body_structured() {
        let client = test_client(8192);
        let schema = serde_json::json!({"type": "OBJECT", "properties": {}});
        let request = CompletionRequest::structured("Buat RPM", schema.clone(), 4096);

        let body = client.build_request_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Buat RPM");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_build_request_body_free_text() {
        let client = test_client(8192);
        let request = CompletionRequest {
            prompt: "Halo".to_string(),
            response_schema: None,
            max_tokens: 100,
        };

        let body = client.build_request_body(&request);
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client(1000);
        let request = CompletionRequest::structured("Test", serde_json::json!({}), 5000);
        let body = client.build_request_body(&request);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1000);
    }

    #[test]
    fn test_parse_response_concatenates_text_parts() {
        let client = test_client(8192);
        let response = parse(
            &client,
            serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            {"text": "thinking...", "thought": true},
                            {"text": "{\"a\":"},
                            {"text": "1}"}
                        ]
                    },
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 80, "totalTokenCount": 200}
            }),
        )
        .unwrap();

        assert_eq!(response.content.as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.input_tokens, 120);
        assert_eq!(response.usage.output_tokens, 80);
    }

    #[test]
    fn test_parse_response_without_text() {
        let client = test_client(8192);
        let response = parse(
            &client,
            serde_json::json!({
                "candidates": [{"finishReason": "MAX_TOKENS"}]
            }),
        )
        .unwrap();
        assert!(response.content.is_none());
        assert_eq!(response.finish_reason, FinishReason::MaxTokens);
        assert_eq!(response.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let client = test_client(8192);
        let result = parse(
            &client,
            serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }),
        );
        match result {
            Err(LlmError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = LlmConfig {
            api_key_env: "RPMGEN_GEMINI_TEST_KEY_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(GeminiClient::from_config(&config), Err(LlmError::Config(_))));
    }
}
