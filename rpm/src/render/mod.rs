//! Document rendering
//!
//! Turns a generated plan plus the signature details from the form into a
//! printable document. HTML is the default and escapes every value; Markdown
//! is written verbatim; JSON is the plan record itself.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::domain::{GeneratedPlan, LessonForm};

const HTML_TEMPLATE: &str = include_str!("../../templates/document.html.hbs");
const MARKDOWN_TEMPLATE: &str = include_str!("../../templates/document.md.hbs");

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Format a date the way the Indonesian long locale does (`14 Oktober 2026`)
pub fn format_indonesian_date(date: NaiveDate) -> String {
    let month = MONTHS_ID[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
    Json,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] = &[Self::Html, Self::Markdown, Self::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }

    /// Pick a format from a file extension, HTML when unknown
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{}' (expected html, markdown or json)", other)),
        }
    }
}

/// Signature block values, taken from the form rather than the plan
#[derive(Debug, Clone, Serialize)]
struct Signatures<'a> {
    school_name: &'a str,
    principal_name: &'a str,
    principal_nip: &'a str,
    teacher_name: &'a str,
    teacher_nip: &'a str,
    date: String,
}

#[derive(Debug, Serialize)]
struct DocumentContext<'a> {
    plan: &'a GeneratedPlan,
    signatures: Signatures<'a>,
}

/// Renders plans into documents
pub struct DocumentRenderer {
    html: Handlebars<'static>,
    markdown: Handlebars<'static>,
}

impl DocumentRenderer {
    pub fn new() -> Result<Self> {
        debug!("DocumentRenderer::new: called");
        let mut html = Handlebars::new();
        html.set_strict_mode(true);
        html.register_template_string("document", HTML_TEMPLATE)
            .context("Failed to compile HTML document template")?;

        let mut markdown = Handlebars::new();
        markdown.set_strict_mode(true);
        markdown.register_escape_fn(handlebars::no_escape);
        markdown
            .register_template_string("document", MARKDOWN_TEMPLATE)
            .context("Failed to compile Markdown document template")?;

        Ok(Self { html, markdown })
    }

    /// Render `plan` with the signature block from `form`, dated `date`
    pub fn render(&self, plan: &GeneratedPlan, form: &LessonForm, date: NaiveDate, format: OutputFormat) -> Result<String> {
        debug!(%format, %date, "DocumentRenderer::render: called");
        if format == OutputFormat::Json {
            return serde_json::to_string_pretty(plan).context("Failed to serialize plan");
        }

        let context = DocumentContext {
            plan,
            signatures: Signatures {
                school_name: &form.school_name,
                principal_name: &form.principal_name,
                principal_nip: &form.principal_nip,
                teacher_name: &form.teacher_name,
                teacher_nip: &form.teacher_nip,
                date: format_indonesian_date(date),
            },
        };

        let registry = match format {
            OutputFormat::Markdown => &self.markdown,
            _ => &self.html,
        };
        registry
            .render("document", &context)
            .context(format!("Failed to render {} document", format))
    }
}
