//! Domain types: the input form, the generated plan and the option lists

mod form;
mod options;
mod plan;

pub use form::{LessonForm, MeetingPedagogy, TextField};
pub use options::{Dimension, KbcTheme, Level, OptionParseError, OptionValue, Pedagogy, join_labels, parse_option};
pub use plan::{Asesmen, Desain, GeneratedPlan, Identifikasi, Identitas, Pengalaman, PlanParseError};

#[cfg(test)]
pub(crate) use plan::fixtures;
