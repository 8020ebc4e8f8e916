//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults, then renders them with the lesson form.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{LessonForm, OptionValue, join_labels};

/// Template name of the lesson plan prompt
pub const RPM_TEMPLATE: &str = "rpm";

/// Context for rendering the lesson plan prompt
///
/// Lists are pre-joined so templates only substitute strings.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub school_name: String,
    pub level: String,
    pub class_name: String,
    pub subject: String,
    pub learning_outcome: String,
    pub learning_objective: String,
    pub material: String,
    pub meeting_count: u32,
    pub duration_per_meeting: String,
    /// `Pertemuan 1: PjBL, Pertemuan 2: Inkuiri-Discovery`
    pub pedagogies_by_meeting: String,
    /// `PjBL/Inkuiri-Discovery`, one per meeting
    pub pedagogy_syntax: String,
    pub dimensions: String,
    pub kbc_themes: String,
    pub kbc_material: String,
}

impl PromptContext {
    /// Build the context from a form, copying every value verbatim
    pub fn from_form(form: &LessonForm) -> Self {
        debug!(meeting_count = %form.meeting_count, "PromptContext::from_form: called");
        let pedagogies_by_meeting = form
            .pedagogies
            .iter()
            .map(|p| format!("Pertemuan {}: {}", p.meeting_no, p.practice.label()))
            .collect::<Vec<_>>()
            .join(", ");
        let pedagogy_syntax = form
            .pedagogies
            .iter()
            .map(|p| p.practice.label())
            .collect::<Vec<_>>()
            .join("/");

        Self {
            school_name: form.school_name.clone(),
            level: form.level.label().to_string(),
            class_name: form.class_name.clone(),
            subject: form.subject.clone(),
            learning_outcome: form.learning_outcome.clone(),
            learning_objective: form.learning_objective.clone(),
            material: form.material.clone(),
            meeting_count: form.meeting_count,
            duration_per_meeting: form.duration_per_meeting.clone(),
            pedagogies_by_meeting,
            pedagogy_syntax,
            dimensions: join_labels(&form.dimensions, ", "),
            kbc_themes: join_labels(&form.kbc_themes, ", "),
            kbc_material: form.kbc_material.clone(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (config `prompts-dir`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `user_dir` before the embedded prompts
    pub fn new(user_dir: Option<PathBuf>) -> Self {
        debug!(?user_dir, "PromptLoader::new: called");
        let user_dir = user_dir.filter(|dir| {
            let exists = dir.exists();
            if !exists {
                debug!(?dir, "PromptLoader::new: override directory missing, ignoring");
            }
            exists
        });
        Self {
            hbs: Self::engine(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    // Form values go into the prompt as typed, so no HTML escaping
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{prompts-dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            } else {
                debug!(?path, "PromptLoader::load_template: not found in user override");
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}' for {}", template_name, context.school_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the lesson plan prompt for `form`
    pub fn rpm_prompt(&self, form: &LessonForm) -> Result<String> {
        debug!("PromptLoader::rpm_prompt: called");
        self.render(RPM_TEMPLATE, &PromptContext::from_form(form))
    }
}
