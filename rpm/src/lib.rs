//! Generator RPM - Perencanaan Pembelajaran Mendalam
//!
//! Collects the planning details a teacher provides for a madrasah lesson,
//! asks Gemini for a deep-learning lesson plan in a fixed JSON shape, and
//! renders the result as a printable document.
//!
//! # Core Concepts
//!
//! - **One writer per form**: every edit goes through [`form::FormState`], which
//!   keeps one pedagogy entry per meeting
//! - **Closed result shape**: the plan has exactly five groups of text fields
//!   and anything else in a response is a failure
//! - **One failure kind**: callers only ever see [`generate::GenerationFailed`];
//!   the cause goes to the log
//!
//! # Modules
//!
//! - [`domain`] - Form record, option lists and the generated plan
//! - [`form`] - Form state manager and YAML form files
//! - [`prompts`] - Handlebars prompt template
//! - [`llm`] - Client trait and Gemini implementation
//! - [`generate`] - Response schema and plan generator
//! - [`session`] - Generation attempt state machine
//! - [`render`] - HTML, Markdown and JSON documents
//! - [`repl`] - Interactive form editor
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod generate;
pub mod llm;
pub mod prompts;
pub mod render;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{
    Dimension, GeneratedPlan, KbcTheme, LessonForm, Level, MeetingPedagogy, OptionValue, Pedagogy, TextField,
};
pub use form::{FormState, load_form, save_form};
pub use generate::{GENERATION_FAILED_MESSAGE, GenerationFailed, PlanGenerator, plan_schema};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use render::{DocumentRenderer, OutputFormat};
pub use session::{AttemptState, GenerationSession, SessionError};
