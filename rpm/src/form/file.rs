//! YAML form files
//!
//! A form file mirrors [`LessonForm`] with kebab-case keys. Loading replays
//! each value through [`FormState`] so the pedagogy list stays consistent
//! with the meeting count no matter what the file says.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::FormState;
use crate::domain::{Dimension, KbcTheme, LessonForm, Level, Pedagogy, TextField};

/// Meeting count as written in a file
///
/// Any scalar is accepted and read back as text, so `3.5`, `true` or a huge
/// integer go through the same coercion as a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingCountInput(pub serde_yaml::Value);

impl MeetingCountInput {
    fn as_text(&self) -> String {
        match &self.0 {
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::String(s) => s.clone(),
            _ => String::new(),
        }
    }
}

impl From<u32> for MeetingCountInput {
    fn from(count: u32) -> Self {
        Self(serde_yaml::Value::from(count))
    }
}

/// On-disk shape of a lesson form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormFile {
    pub school_name: String,
    pub teacher_name: String,
    pub teacher_nip: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub level: Option<Level>,
    pub class_name: String,
    pub subject: String,
    pub learning_outcome: String,
    pub learning_objective: String,
    pub material: String,
    pub meeting_count: Option<MeetingCountInput>,
    pub duration_per_meeting: String,
    /// Pedagogy per meeting, in meeting order
    pub pedagogies: Vec<Pedagogy>,
    pub dimensions: Vec<Dimension>,
    pub kbc_themes: Vec<KbcTheme>,
    pub kbc_material: String,
}

impl FormFile {
    fn text(&self, field: TextField) -> &str {
        match field {
            TextField::SchoolName => &self.school_name,
            TextField::TeacherName => &self.teacher_name,
            TextField::TeacherNip => &self.teacher_nip,
            TextField::PrincipalName => &self.principal_name,
            TextField::PrincipalNip => &self.principal_nip,
            TextField::ClassName => &self.class_name,
            TextField::Subject => &self.subject,
            TextField::LearningOutcome => &self.learning_outcome,
            TextField::LearningObjective => &self.learning_objective,
            TextField::Material => &self.material,
            TextField::DurationPerMeeting => &self.duration_per_meeting,
            TextField::KbcMaterial => &self.kbc_material,
        }
    }

    /// Build form state by applying every value in order
    pub fn into_state(self) -> FormState {
        debug!("FormFile::into_state: called");
        let mut state = FormState::new();

        for field in TextField::ALL {
            state.set_text(*field, self.text(*field));
        }

        if let Some(level) = self.level {
            state.set_level(level);
        }

        match &self.meeting_count {
            Some(count) => state.set_meeting_count_text(&count.as_text()),
            None => {
                // Without an explicit count, one meeting per listed pedagogy
                let implied = self.pedagogies.len().max(1);
                debug!(%implied, "FormFile::into_state: meeting count implied by pedagogies");
                state.set_meeting_count(u32::try_from(implied).unwrap_or(u32::MAX));
            }
        }

        for (index, practice) in self.pedagogies.iter().enumerate() {
            if !state.set_pedagogy(index, *practice) {
                warn!(
                    meeting = index + 1,
                    meeting_count = state.record().meeting_count,
                    "Ignoring pedagogy for meeting beyond the meeting count"
                );
            }
        }

        for dimension in &self.dimensions {
            state.select_dimension(*dimension);
        }
        for theme in &self.kbc_themes {
            state.select_kbc_theme(*theme);
        }

        state
    }
}

impl From<&LessonForm> for FormFile {
    fn from(form: &LessonForm) -> Self {
        Self {
            school_name: form.school_name.clone(),
            teacher_name: form.teacher_name.clone(),
            teacher_nip: form.teacher_nip.clone(),
            principal_name: form.principal_name.clone(),
            principal_nip: form.principal_nip.clone(),
            level: Some(form.level),
            class_name: form.class_name.clone(),
            subject: form.subject.clone(),
            learning_outcome: form.learning_outcome.clone(),
            learning_objective: form.learning_objective.clone(),
            material: form.material.clone(),
            meeting_count: Some(MeetingCountInput::from(form.meeting_count)),
            duration_per_meeting: form.duration_per_meeting.clone(),
            pedagogies: form.pedagogies.iter().map(|p| p.practice).collect(),
            dimensions: form.dimensions.clone(),
            kbc_themes: form.kbc_themes.clone(),
            kbc_material: form.kbc_material.clone(),
        }
    }
}

/// Parse form YAML into state
pub fn parse_form(content: &str) -> Result<FormState> {
    debug!(content_len = content.len(), "parse_form: called");
    let file: FormFile = serde_yaml::from_str(content).context("Failed to parse form file")?;
    Ok(file.into_state())
}

/// Load a form file from disk
pub fn load_form(path: impl AsRef<Path>) -> Result<FormState> {
    let path = path.as_ref();
    debug!(?path, "load_form: called");
    let content = fs::read_to_string(path).context(format!("Failed to read form file {}", path.display()))?;
    let state = parse_form(&content).context(format!("Invalid form file {}", path.display()))?;
    info!("Loaded form from: {}", path.display());
    Ok(state)
}

/// Write the form to disk as YAML
pub fn save_form(form: &LessonForm, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, "save_form: called");
    let content = serde_yaml::to_string(&FormFile::from(form)).context("Failed to serialize form")?;
    fs::write(path, content).context(format!("Failed to write form file {}", path.display()))?;
    info!("Saved form to: {}", path.display());
    Ok(())
}

/// Annotated starter form written by `rpmgen init`
pub const STARTER_FORM: &str = r#"# Generator RPM - data input perencanaan
# Wajib diisi sebelum generate: school-name dan subject.

# Profil Satuan Pendidikan
school-name: ""
level: MI            # MI | MTs | MA
class-name: ""       # contoh: VII-A
subject: ""          # contoh: Akidah Akhlak

# Identitas Guru & Kepala
teacher-name: ""
teacher-nip: ""
principal-name: ""
principal-nip: ""

# Substansi Kurikulum
learning-outcome: "" # Capaian Pembelajaran (CP)
learning-objective: "" # Tujuan Pembelajaran (TP)
material: ""         # contoh: Adab Bertetangga
meeting-count: 1
duration-per-meeting: "" # contoh: 2 x 35 menit

# Praktik pedagogis per pertemuan, urut sesuai nomor pertemuan:
# Inkuiri-Discovery | PjBL | Cooperative Learning | Experiential Learning (ARKA)
pedagogies:
  - Inkuiri-Discovery

# Dimensi Lulusan (pilih beberapa), lihat `rpmgen options`
dimensions: []

# Tema KBC (pilih beberapa), lihat `rpmgen options`
kbc-themes: []

kbc-material: ""     # Materi Insersi KBC
"#;
