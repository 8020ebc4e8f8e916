//! Integration tests for the generation flow
//!
//! Drives form loading, the generation session and document rendering
//! through the public API with a scripted client in place of Gemini.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use rpmgen::domain::{Dimension, Pedagogy, TextField};
use rpmgen::form::parse_form;
use rpmgen::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, TokenUsage};
use rpmgen::prompts::PromptLoader;
use rpmgen::{AttemptState, DocumentRenderer, GenerationFailed, GenerationSession, OutputFormat, PlanGenerator, SessionError};

/// Answers each call with the next scripted reply
struct ScriptedClient {
    replies: Mutex<Vec<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(LlmError::InvalidResponse("script exhausted".to_string()));
        }
        replies.remove(0).map(|text| CompletionResponse {
            content: Some(text),
            finish_reason: FinishReason::Stop,
            usage: TokenUsage::default(),
        })
    }
}

const FORM: &str = r#"
school-name: MTsN 2 Bandung
level: MTs
class-name: VIII-B
subject: Fikih
teacher-name: Dedi Supriadi
teacher-nip: "198505052010011002"
principal-name: Hj. Nurhayati
principal-nip: "197505051999032001"
meeting-count: "3 pertemuan"
duration-per-meeting: 2 x 40 menit
pedagogies:
  - Cooperative Learning
  - PjBL
  - Experiential Learning (ARKA)
  - PjBL
dimensions:
  - Penalaran Kritis
kbc-themes:
  - Cinta Lingkungan
"#;

fn plan_text(topik: &str) -> String {
    serde_json::json!({
        "identitas": {
            "schoolName": "MTsN 2 Bandung",
            "subject": "Fikih",
            "classSemester": "VIII / Genap",
            "duration": "2 x 40 menit"
        },
        "identifikasi": {"siswa": "S", "materi": "M", "dimensi": "Penalaran Kritis"},
        "desain": {
            "cp": "CP",
            "lintasDisiplin": "IPA",
            "tp": "TP",
            "topik": topik,
            "pedagogis": "Cooperative Learning/PjBL/Experiential Learning (ARKA)",
            "kemitraan": "K",
            "lingkungan": "L",
            "digital": "D"
        },
        "pengalaman": {"memahami": "A", "mengaplikasi": "B", "refleksi": "C"},
        "asesmen": {"awal": "X", "proses": "Y", "akhir": "Z"}
    })
    .to_string()
}

fn generator(client: Arc<ScriptedClient>) -> PlanGenerator {
    PlanGenerator::new(client, PromptLoader::embedded_only(), 8192)
}

#[test]
fn test_form_file_coerces_count_and_ignores_extra_pedagogies() {
    let form = parse_form(FORM).unwrap();
    let record = form.record();

    assert_eq!(record.meeting_count, 3);
    let practices: Vec<Pedagogy> = record.pedagogies.iter().map(|p| p.practice).collect();
    assert_eq!(
        practices,
        [Pedagogy::Cooperative, Pedagogy::ProjectBased, Pedagogy::Experiential]
    );
    let numbers: Vec<u32> = record.pedagogies.iter().map(|p| p.meeting_no).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert_eq!(record.dimensions, [Dimension::CriticalReasoning]);
}

#[tokio::test]
async fn test_generate_then_render_markdown() {
    let client = ScriptedClient::new(vec![Ok(plan_text("Thaharah dan Lingkungan"))]);
    let generator = generator(client.clone());
    let mut session = GenerationSession::new(parse_form(FORM).unwrap());

    let plan = session.generate(&generator).await.unwrap().clone();
    assert_eq!(session.state(), AttemptState::Succeeded);
    assert_eq!(plan.desain.topik, "Thaharah dan Lingkungan");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("Pertemuan 1: Cooperative Learning, Pertemuan 2: PjBL, Pertemuan 3: Experiential Learning (ARKA)"));
    assert!(prompt.contains("Cooperative Learning/PjBL/Experiential Learning (ARKA)"));
    let schema = requests[0].response_schema.as_ref().expect("schema attached");
    assert_eq!(schema["required"].as_array().map(|r| r.len()), Some(5));

    let renderer = DocumentRenderer::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 8, 17).unwrap();
    let md = renderer
        .render(&plan, session.form().record(), date, OutputFormat::Markdown)
        .unwrap();
    assert!(md.contains("**Thaharah dan Lingkungan**"));
    assert!(md.contains("Kepala MTsN 2 Bandung"));
    assert!(md.contains(", 17 Agustus 2026"));
    assert!(md.contains("NIP. 197505051999032001"));
}

#[tokio::test]
async fn test_failed_attempt_keeps_previous_plan() {
    let client = ScriptedClient::new(vec![
        Ok(plan_text("Pertama")),
        Err(LlmError::ApiError {
            status: 403,
            message: "API key not valid".to_string(),
        }),
        Ok("not json".to_string()),
        Ok(plan_text("Kedua")),
    ]);
    let generator = generator(client.clone());
    let mut session = GenerationSession::new(parse_form(FORM).unwrap());

    session.generate(&generator).await.unwrap();

    for _ in 0..2 {
        let err = session.generate(&generator).await.unwrap_err();
        assert_eq!(err, SessionError::Generation(GenerationFailed));
        assert_eq!(session.state(), AttemptState::Failed);
        assert_eq!(session.result().map(|p| p.desain.topik.as_str()), Some("Pertama"));
    }

    session
        .form_mut()
        .set_text(TextField::Material, "Najis dan cara menyucikannya");
    let plan = session.generate(&generator).await.unwrap();
    assert_eq!(plan.desain.topik, "Kedua");
    assert!(session.error().is_none());
    assert_eq!(client.requests().len(), 4);
    assert!(client.requests()[3].prompt.contains("Najis dan cara menyucikannya"));
}

#[tokio::test]
async fn test_unsubmittable_form_never_calls_client() {
    let client = ScriptedClient::new(vec![Ok(plan_text("Tidak dipakai"))]);
    let generator = generator(client.clone());
    let mut form = parse_form(FORM).unwrap();
    form.set_text(TextField::Subject, "");
    let mut session = GenerationSession::new(form);

    assert!(!session.can_generate());
    assert_eq!(session.generate(&generator).await.unwrap_err(), SessionError::NotSubmittable);
    assert_eq!(session.state(), AttemptState::Idle);
    assert!(client.requests().is_empty());
}
