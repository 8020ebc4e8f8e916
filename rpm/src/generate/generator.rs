//! Plan generator
//!
//! Turns a lesson form into one structured request and the response into a
//! [`GeneratedPlan`]. Every way this can go wrong surfaces as the same
//! [`GenerationFailed`] error; the cause is only logged.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::schema::plan_schema;
use crate::config::Config;
use crate::domain::{GeneratedPlan, LessonForm};
use crate::llm::{CompletionRequest, LlmClient, create_client};
use crate::prompts::PromptLoader;

/// Message shown to the user when generation fails
pub const GENERATION_FAILED_MESSAGE: &str = "Gagal menghasilkan RPM. Pastikan API Key Anda valid dan coba lagi.";

/// Generation did not produce a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Gagal menghasilkan RPM. Pastikan API Key Anda valid dan coba lagi.")]
pub struct GenerationFailed;

/// Generates lesson plans through an [`LlmClient`]
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        debug!(%max_tokens, "PlanGenerator::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Build the generator described by `config`
    ///
    /// Fails when the API key variable is unset or the provider is unknown.
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        debug!(provider = %config.llm.provider, "PlanGenerator::from_config: called");
        config.validate()?;
        let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
        Ok(Self::new(
            llm,
            PromptLoader::new(config.prompts_dir.clone()),
            config.llm.max_tokens,
        ))
    }

    /// Build the request for `form` without sending it
    pub fn build_request(&self, form: &LessonForm) -> eyre::Result<CompletionRequest> {
        debug!("PlanGenerator::build_request: called");
        let prompt = self.prompts.rpm_prompt(form)?;
        Ok(CompletionRequest::structured(prompt, plan_schema(), self.max_tokens))
    }

    /// Generate a plan with exactly one call to the service
    pub async fn generate(&self, form: &LessonForm) -> Result<GeneratedPlan, GenerationFailed> {
        debug!(school = %form.school_name, subject = %form.subject, "PlanGenerator::generate: called");

        let request = self.build_request(form).map_err(|e| {
            warn!(error = %e, "Generation failed: could not build prompt");
            GenerationFailed
        })?;

        let response = self.llm.complete(request).await.map_err(|e| {
            warn!(error = %e, transport = e.is_transport(), auth = e.is_auth(), "Generation failed: service call");
            GenerationFailed
        })?;

        let Some(text) = response.content else {
            warn!(finish_reason = ?response.finish_reason, "Generation failed: response has no text");
            return Err(GenerationFailed);
        };

        let plan = GeneratedPlan::from_response_text(&text).map_err(|e| {
            warn!(error = %e, finish_reason = ?response.finish_reason, "Generation failed: malformed plan");
            GenerationFailed
        })?;

        info!(
            topik = %plan.desain.topik,
            output_tokens = response.usage.output_tokens,
            "Lesson plan generated"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TextField, fixtures};
    use crate::form::FormState;
    use crate::llm::client::mock::{MockLlmClient, MockReply};

    fn form() -> LessonForm {
        let mut state = FormState::new();
        state.set_text(TextField::SchoolName, "MIN 1 Jakarta");
        state.set_text(TextField::Subject, "Akidah Akhlak");
        state.into_record()
    }

    fn generator(mock: Arc<MockLlmClient>) -> PlanGenerator {
        PlanGenerator::new(mock, PromptLoader::embedded_only(), 8192)
    }

    #[tokio::test]
    async fn test_generate_success_returns_plan_verbatim() {
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::Text(fixtures::plan_json().to_string())]));
        let plan = generator(mock.clone()).generate(&form()).await.unwrap();

        let expected: GeneratedPlan = serde_json::from_value(fixtures::plan_json()).unwrap();
        assert_eq!(plan, expected);
        assert_eq!(mock.call_count(), 1);

        let request = &mock.requests()[0];
        assert!(request.prompt.contains("Nama Satuan Pendidikan: MIN 1 Jakarta"));
        assert_eq!(request.response_schema, Some(plan_schema()));
        assert_eq!(request.max_tokens, 8192);
    }

    #[tokio::test]
    async fn test_schema_incomplete_payload_fails() {
        let mut payload = fixtures::plan_json();
        payload.as_object_mut().unwrap().remove("asesmen");
        let mock = Arc::new(MockLlmClient::new(vec![MockReply::Text(payload.to_string())]));

        let result = generator(mock.clone()).generate(&form()).await;
        assert_eq!(result, Err(GenerationFailed));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_and_payload_failures_are_indistinguishable() {
        let transport = Arc::new(MockLlmClient::new(vec![MockReply::Timeout]));
        let api = Arc::new(MockLlmClient::new(vec![MockReply::Api(403, "PERMISSION_DENIED".to_string())]));
        let malformed = Arc::new(MockLlmClient::new(vec![MockReply::Text("bukan json".to_string())]));
        let empty = Arc::new(MockLlmClient::new(vec![MockReply::NoContent]));

        let results = [
            generator(transport.clone()).generate(&form()).await,
            generator(api.clone()).generate(&form()).await,
            generator(malformed.clone()).generate(&form()).await,
            generator(empty.clone()).generate(&form()).await,
        ];

        for result in &results {
            assert_eq!(result, &Err(GenerationFailed));
        }
        for mock in [transport, api, malformed, empty] {
            assert_eq!(mock.call_count(), 1, "no retries");
        }
    }

    #[test]
    fn test_error_message_is_static() {
        assert_eq!(GenerationFailed.to_string(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_config_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "RPMGEN_GENERATOR_TEST_KEY".to_string();
        // SAFETY: serialized with the other env-touching tests
        unsafe { std::env::remove_var("RPMGEN_GENERATOR_TEST_KEY") };
        assert!(PlanGenerator::from_config(&config).is_err());

        // SAFETY: serialized with the other env-touching tests
        unsafe { std::env::set_var("RPMGEN_GENERATOR_TEST_KEY", "secret") };
        assert!(PlanGenerator::from_config(&config).is_ok());

        config.llm.provider = "openai".to_string();
        assert!(PlanGenerator::from_config(&config).is_err());
        // SAFETY: serialized with the other env-touching tests
        unsafe { std::env::remove_var("RPMGEN_GENERATOR_TEST_KEY") };
    }
}
