//! Generation session
//!
//! Ties the form to generation attempts. One attempt at a time: the session
//! moves Idle -> Pending -> Succeeded | Failed and refuses a new attempt while
//! one is pending. A failed attempt keeps the previous plan.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{GeneratedPlan, LessonForm};
use crate::form::FormState;
use crate::generate::{GenerationFailed, PlanGenerator};

/// State of the latest generation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why a session operation was refused or failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Nama Satuan Pendidikan dan Mata Pelajaran wajib diisi sebelum generate")]
    NotSubmittable,

    #[error("Proses pembuatan RPM sedang berjalan")]
    AlreadyPending,

    #[error("Tidak ada proses pembuatan RPM yang sedang berjalan")]
    NotPending,

    #[error(transparent)]
    Generation(#[from] GenerationFailed),
}

/// Form plus the outcome of the latest generation attempt
#[derive(Debug, Clone)]
pub struct GenerationSession {
    form: FormState,
    state: AttemptState,
    result: Option<GeneratedPlan>,
    error: Option<GenerationFailed>,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new(FormState::new())
    }
}

impl GenerationSession {
    pub fn new(form: FormState) -> Self {
        debug!("GenerationSession::new: called");
        Self {
            form,
            state: AttemptState::Idle,
            result: None,
            error: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Mutable access for edits between attempts
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Latest successful plan, kept across later failures
    pub fn result(&self) -> Option<&GeneratedPlan> {
        self.result.as_ref()
    }

    /// Error of the latest attempt, cleared when a new attempt starts
    pub fn error(&self) -> Option<&GenerationFailed> {
        self.error.as_ref()
    }

    /// Whether the generate trigger is enabled
    pub fn can_generate(&self) -> bool {
        self.state != AttemptState::Pending && self.form.is_submittable()
    }

    /// Start an attempt, returning the form snapshot to generate from
    pub fn begin_attempt(&mut self) -> Result<LessonForm, SessionError> {
        debug!(state = %self.state, "GenerationSession::begin_attempt: called");
        if self.state == AttemptState::Pending {
            debug!("GenerationSession::begin_attempt: already pending");
            return Err(SessionError::AlreadyPending);
        }
        if !self.form.is_submittable() {
            debug!("GenerationSession::begin_attempt: form not submittable");
            return Err(SessionError::NotSubmittable);
        }
        self.error = None;
        self.state = AttemptState::Pending;
        Ok(self.form.record().clone())
    }

    /// Record the outcome of the pending attempt
    pub fn finish_attempt(&mut self, outcome: Result<GeneratedPlan, GenerationFailed>) -> Result<(), SessionError> {
        debug!(state = %self.state, ok = outcome.is_ok(), "GenerationSession::finish_attempt: called");
        if self.state != AttemptState::Pending {
            return Err(SessionError::NotPending);
        }
        match outcome {
            Ok(plan) => {
                self.result = Some(plan);
                self.error = None;
                self.state = AttemptState::Succeeded;
            }
            Err(e) => {
                // Previous result stays visible
                self.error = Some(e);
                self.state = AttemptState::Failed;
            }
        }
        Ok(())
    }

    /// Run one full attempt with `generator`
    pub async fn generate(&mut self, generator: &PlanGenerator) -> Result<&GeneratedPlan, SessionError> {
        let snapshot = self.begin_attempt()?;
        info!("Generating lesson plan for {}", snapshot.school_name);
        let outcome = generator.generate(&snapshot).await;
        self.finish_attempt(outcome)?;

        match (&self.error, &self.result) {
            (Some(e), _) => {
                warn!("Generation attempt failed");
                Err(SessionError::Generation(*e))
            }
            (None, Some(plan)) => Ok(plan),
            (None, None) => Err(SessionError::Generation(GenerationFailed)),
        }
    }
}
