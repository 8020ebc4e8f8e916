//! Form state management and form files
//!
//! [`FormState`] is the only writer of a [`crate::domain::LessonForm`]. Form
//! files and the interactive editor both go through its operations.

mod file;
mod manager;

pub use file::{FormFile, MeetingCountInput, STARTER_FORM, load_form, parse_form, save_form};
pub use manager::{DEFAULT_PEDAGOGY, FormState, MAX_MEETINGS, parse_meeting_count};
