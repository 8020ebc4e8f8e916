//! The generated lesson plan (RPM)
//!
//! The shape is closed: five groups of required strings, nothing else. Any
//! missing, extra or non-string field is a parse failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Why a response body could not be turned into a [`GeneratedPlan`]
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("Response body is empty")]
    Empty,

    #[error("Response does not match the plan schema: {0}")]
    Schema(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Identitas {
    pub school_name: String,
    pub subject: String,
    pub class_semester: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identifikasi {
    pub siswa: String,
    pub materi: String,
    pub dimensi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Desain {
    pub cp: String,
    pub lintas_disiplin: String,
    pub tp: String,
    pub topik: String,
    pub pedagogis: String,
    pub kemitraan: String,
    pub lingkungan: String,
    pub digital: String,
}

/// Learning experience, in three phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pengalaman {
    pub memahami: String,
    pub mengaplikasi: String,
    pub refleksi: String,
}

/// Assessment, in three phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Asesmen {
    pub awal: String,
    pub proses: String,
    pub akhir: String,
}

/// Structured lesson plan returned by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedPlan {
    pub identitas: Identitas,
    pub identifikasi: Identifikasi,
    pub desain: Desain,
    pub pengalaman: Pengalaman,
    pub asesmen: Asesmen,
}

impl GeneratedPlan {
    /// Parse the raw text returned by the service
    pub fn from_response_text(text: &str) -> Result<Self, PlanParseError> {
        debug!(text_len = text.len(), "GeneratedPlan::from_response_text: called");
        if text.trim().is_empty() {
            debug!("GeneratedPlan::from_response_text: empty body");
            return Err(PlanParseError::Empty);
        }
        let plan: Self = serde_json::from_str(text)?;
        debug!("GeneratedPlan::from_response_text: parsed");
        Ok(plan)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    /// A complete, schema-conformant response body
    pub fn plan_json() -> serde_json::Value {
        json!({
            "identitas": {
                "schoolName": "MIN 1 Jakarta",
                "subject": "Akidah Akhlak",
                "classSemester": "IV / Ganjil",
                "duration": "2 x 35 menit"
            },
            "identifikasi": {
                "siswa": "Siswa kelas IV aktif dan ingin tahu.",
                "materi": "Adab bertetangga dalam Islam.",
                "dimensi": "Keimanan & Ketakwaan, Kolaborasi"
            },
            "desain": {
                "cp": "Peserta didik memahami adab.",
                "lintasDisiplin": "Terhubung dengan PPKn dan Bahasa Indonesia.",
                "tp": "Siswa mampu menjelaskan adab bertetangga.",
                "topik": "Tetanggaku Saudaraku",
                "pedagogis": "Inkuiri-Discovery",
                "kemitraan": "Orang tua dan ketua RT.",
                "lingkungan": "Kelas dan lingkungan sekitar madrasah.",
                "digital": "Quizizz untuk kuis, Canva untuk poster."
            },
            "pengalaman": {
                "memahami": "Guru membuka dengan cerita.",
                "mengaplikasi": "1. Orientasi\n2. Eksplorasi\n3. Presentasi",
                "refleksi": "Siswa menuliskan satu adab yang akan dipraktikkan."
            },
            "asesmen": {
                "awal": "Pertanyaan apersepsi lisan.",
                "proses": "Rubrik observasi diskusi kelompok.",
                "akhir": "Poster adab bertetangga."
            }
        })
    }
}
