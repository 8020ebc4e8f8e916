//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// One call is one network round trip. Implementations do not retry and do
/// not stream; callers get either the full response or an error.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::llm::{FinishReason, TokenUsage};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    /// What the mock answers for one call
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Successful response with this text
        Text(String),
        /// Successful response without any text
        NoContent,
        /// Transport failure
        Timeout,
        /// Non-success HTTP status
        Api(u16, String),
    }

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        replies: Vec<MockReply>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<MockReply>) -> Self {
            debug!(reply_count = %replies.len(), "MockLlmClient::new: called");
            Self {
                replies,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            let reply = self
                .replies
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))?;

            let content = match reply {
                MockReply::Text(text) => Some(text),
                MockReply::NoContent => None,
                MockReply::Timeout => return Err(LlmError::Timeout(Duration::from_secs(120))),
                MockReply::Api(status, message) => return Err(LlmError::ApiError { status, message }),
            };

            Ok(CompletionResponse {
                content,
                finish_reason: FinishReason::Stop,
                usage: TokenUsage::default(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> CompletionRequest {
            CompletionRequest {
                prompt: "Test".to_string(),
                response_schema: None,
                max_tokens: 1000,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_replies_in_order() {
            let client = MockLlmClient::new(vec![
                MockReply::Text("Response 1".to_string()),
                MockReply::Timeout,
            ]);

            let resp1 = client.complete(request()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(request()).await;
            assert!(matches!(resp2, Err(LlmError::Timeout(_))));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            assert!(client.complete(request()).await.is_err());
        }
    }
}
