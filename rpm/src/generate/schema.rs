//! Response schema sent with every generation request
//!
//! Mirrors [`crate::domain::GeneratedPlan`]: five required objects of
//! required strings, no arrays and no optional fields.

use serde_json::{Map, Value, json};

/// Group name and its string properties, in wire order
pub const PLAN_GROUPS: &[(&str, &[&str])] = &[
    ("identitas", &["schoolName", "subject", "classSemester", "duration"]),
    ("identifikasi", &["siswa", "materi", "dimensi"]),
    (
        "desain",
        &[
            "cp",
            "lintasDisiplin",
            "tp",
            "topik",
            "pedagogis",
            "kemitraan",
            "lingkungan",
            "digital",
        ],
    ),
    ("pengalaman", &["memahami", "mengaplikasi", "refleksi"]),
    ("asesmen", &["awal", "proses", "akhir"]),
];

fn object_of_strings(fields: &[&str]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "STRING" })))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}

/// The structured-output schema for a lesson plan
pub fn plan_schema() -> Value {
    let properties: Map<String, Value> = PLAN_GROUPS
        .iter()
        .map(|(group, fields)| (group.to_string(), object_of_strings(fields)))
        .collect();
    let required: Vec<&str> = PLAN_GROUPS.iter().map(|(group, _)| *group).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}
