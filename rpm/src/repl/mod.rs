//! Interactive form editor for Generator RPM
//!
//! Edits a form line by line, shows the prompt, and generates from it
//! without leaving the terminal.

mod session;

pub use session::{EditCommand, EditSession};

use std::path::PathBuf;

use eyre::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::form::{FormState, load_form};
use crate::session::GenerationSession;

/// Run the interactive editor
///
/// This is the main entry point for `rpmgen edit`. A missing form file starts
/// an empty form that `save` writes to that path.
pub async fn run_interactive(config: &Config, form_path: Option<PathBuf>) -> Result<()> {
    debug!(?form_path, "run_interactive: called");
    let form = match &form_path {
        Some(path) if path.exists() => load_form(path)?,
        Some(path) => {
            info!("Form {} does not exist yet, starting empty", path.display());
            FormState::new()
        }
        None => FormState::new(),
    };

    let mut editor = EditSession::new(GenerationSession::new(form), config.clone(), form_path)?;
    editor.run().await
}
