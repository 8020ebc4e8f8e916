//! The lesson-plan input record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::options::{Dimension, KbcTheme, Level, Pedagogy};

/// Pedagogy chosen for one meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MeetingPedagogy {
    /// 1-based meeting number
    pub meeting_no: u32,
    pub practice: Pedagogy,
}

impl MeetingPedagogy {
    pub fn new(meeting_no: u32, practice: Pedagogy) -> Self {
        Self { meeting_no, practice }
    }
}

/// Everything the user fills in before generation
///
/// `pedagogies.len() == meeting_count` and the meeting numbers run 1..=meeting_count.
/// [`crate::form::FormState`] maintains this for the record it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonForm {
    pub school_name: String,
    pub teacher_name: String,
    pub teacher_nip: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub level: Level,
    pub class_name: String,
    pub subject: String,
    /// Capaian Pembelajaran (CP)
    pub learning_outcome: String,
    /// Tujuan Pembelajaran (TP)
    pub learning_objective: String,
    pub material: String,
    pub meeting_count: u32,
    pub duration_per_meeting: String,
    pub pedagogies: Vec<MeetingPedagogy>,
    pub dimensions: Vec<Dimension>,
    pub kbc_themes: Vec<KbcTheme>,
    /// Materi insersi KBC
    pub kbc_material: String,
}

impl Default for LessonForm {
    fn default() -> Self {
        Self {
            school_name: String::new(),
            teacher_name: String::new(),
            teacher_nip: String::new(),
            principal_name: String::new(),
            principal_nip: String::new(),
            level: Level::default(),
            class_name: String::new(),
            subject: String::new(),
            learning_outcome: String::new(),
            learning_objective: String::new(),
            material: String::new(),
            meeting_count: 1,
            duration_per_meeting: String::new(),
            pedagogies: vec![MeetingPedagogy::new(1, Pedagogy::default())],
            dimensions: Vec::new(),
            kbc_themes: Vec::new(),
            kbc_material: String::new(),
        }
    }
}

impl LessonForm {
    /// Read a text field
    pub fn text(&self, field: TextField) -> &str {
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

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::SchoolName => &mut self.school_name,
            TextField::TeacherName => &mut self.teacher_name,
            TextField::TeacherNip => &mut self.teacher_nip,
            TextField::PrincipalName => &mut self.principal_name,
            TextField::PrincipalNip => &mut self.principal_nip,
            TextField::ClassName => &mut self.class_name,
            TextField::Subject => &mut self.subject,
            TextField::LearningOutcome => &mut self.learning_outcome,
            TextField::LearningObjective => &mut self.learning_objective,
            TextField::Material => &mut self.material,
            TextField::DurationPerMeeting => &mut self.duration_per_meeting,
            TextField::KbcMaterial => &mut self.kbc_material,
        }
    }
}

/// Closed set of free-text fields on [`LessonForm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    SchoolName,
    TeacherName,
    TeacherNip,
    PrincipalName,
    PrincipalNip,
    ClassName,
    Subject,
    LearningOutcome,
    LearningObjective,
    Material,
    DurationPerMeeting,
    KbcMaterial,
}

impl TextField {
    pub const ALL: &'static [TextField] = &[
        Self::SchoolName,
        Self::TeacherName,
        Self::TeacherNip,
        Self::PrincipalName,
        Self::PrincipalNip,
        Self::ClassName,
        Self::Subject,
        Self::LearningOutcome,
        Self::LearningObjective,
        Self::Material,
        Self::DurationPerMeeting,
        Self::KbcMaterial,
    ];

    /// Kebab-case key, shared by form files and the interactive editor
    pub fn key(&self) -> &'static str {
        match self {
            Self::SchoolName => "school-name",
            Self::TeacherName => "teacher-name",
            Self::TeacherNip => "teacher-nip",
            Self::PrincipalName => "principal-name",
            Self::PrincipalNip => "principal-nip",
            Self::ClassName => "class-name",
            Self::Subject => "subject",
            Self::LearningOutcome => "learning-outcome",
            Self::LearningObjective => "learning-objective",
            Self::Material => "material",
            Self::DurationPerMeeting => "duration-per-meeting",
            Self::KbcMaterial => "kbc-material",
        }
    }

    /// Indonesian form label
    pub fn label(&self) -> &'static str {
        match self {
            Self::SchoolName => "Nama Satuan Pendidikan",
            Self::TeacherName => "Nama Guru",
            Self::TeacherNip => "NIP Guru",
            Self::PrincipalName => "Nama Kepala Madrasah",
            Self::PrincipalNip => "NIP Kepala Madrasah",
            Self::ClassName => "Kelas",
            Self::Subject => "Mata Pelajaran",
            Self::LearningOutcome => "Capaian Pembelajaran (CP)",
            Self::LearningObjective => "Tujuan Pembelajaran (TP)",
            Self::Material => "Materi Pelajaran",
            Self::DurationPerMeeting => "Durasi",
            Self::KbcMaterial => "Materi Insersi KBC",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| {
                let keys: Vec<_> = Self::ALL.iter().map(|f| f.key()).collect();
                format!("Unknown field '{}'. Valid fields: {}", s, keys.join(", "))
            })
    }
}
