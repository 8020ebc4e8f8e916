//! Form state manager
//!
//! Owns the [`LessonForm`] and applies edits to it. The per-meeting pedagogy
//! list always has one entry per meeting, numbered 1..=meeting_count.

use tracing::debug;

use crate::domain::{Dimension, KbcTheme, LessonForm, Level, MeetingPedagogy, Pedagogy, TextField};

/// Pedagogy assigned to meetings created by growing the meeting count
pub const DEFAULT_PEDAGOGY: Pedagogy = Pedagogy::InquiryDiscovery;

/// Largest meeting count a form can hold
pub const MAX_MEETINGS: u32 = 100;

/// Parse a meeting count typed by the user
///
/// Takes the leading integer of the trimmed text (`"3 pertemuan"` is 3).
/// Anything non-numeric, non-positive or above [`MAX_MEETINGS`] becomes 1.
pub fn parse_meeting_count(text: &str) -> u32 {
    debug!(%text, "parse_meeting_count: called");
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();

    if negative || digits.is_empty() {
        debug!("parse_meeting_count: not a positive number, coercing to 1");
        return 1;
    }

    match digits.parse::<u32>() {
        Ok(n) if (1..=MAX_MEETINGS).contains(&n) => n,
        _ => {
            debug!(%digits, "parse_meeting_count: zero or out of range, coercing to 1");
            1
        }
    }
}

/// Add `value` if absent, remove it if present
fn toggle<T: PartialEq + Copy>(items: &mut Vec<T>, value: T) -> bool {
    if let Some(pos) = items.iter().position(|v| *v == value) {
        items.remove(pos);
        false
    } else {
        items.push(value);
        true
    }
}

/// Mutable owner of the lesson form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    record: LessonForm,
}

impl FormState {
    /// Start from an empty form
    pub fn new() -> Self {
        debug!("FormState::new: called");
        Self::default()
    }

    /// Current record
    pub fn record(&self) -> &LessonForm {
        &self.record
    }

    /// Give up ownership of the record
    pub fn into_record(self) -> LessonForm {
        self.record
    }

    /// Set a free-text field
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        debug!(%field, value_len = value.len(), "FormState::set_text: called");
        *self.record.text_mut(field) = value;
    }

    pub fn set_level(&mut self, level: Level) {
        debug!(%level, "FormState::set_level: called");
        self.record.level = level;
    }

    /// Set the meeting count from user text, see [`parse_meeting_count`]
    pub fn set_meeting_count_text(&mut self, text: &str) {
        debug!(%text, "FormState::set_meeting_count_text: called");
        self.set_meeting_count(parse_meeting_count(text));
    }

    /// Resize the pedagogy list to `count` meetings
    ///
    /// 0 is treated as 1 and counts above [`MAX_MEETINGS`] are clamped to it.
    /// Growing appends [`DEFAULT_PEDAGOGY`] entries; shrinking drops the tail.
    /// Retained entries are never touched.
    pub fn set_meeting_count(&mut self, count: u32) {
        let count = count.clamp(1, MAX_MEETINGS);
        let current = self.record.pedagogies.len();
        debug!(%count, %current, "FormState::set_meeting_count: called");

        let target = count as usize;
        if target > current {
            debug!("FormState::set_meeting_count: growing");
            self.record
                .pedagogies
                .extend(((current as u32 + 1)..=count).map(|no| MeetingPedagogy::new(no, DEFAULT_PEDAGOGY)));
        } else if target < current {
            debug!("FormState::set_meeting_count: truncating");
            self.record.pedagogies.truncate(target);
        } else {
            debug!("FormState::set_meeting_count: unchanged");
        }
        self.record.meeting_count = count;
    }

    /// Change the pedagogy of the entry at `index` (0-based)
    ///
    /// Returns false, leaving the form untouched, when `index` is out of range.
    pub fn set_pedagogy(&mut self, index: usize, practice: Pedagogy) -> bool {
        debug!(%index, %practice, "FormState::set_pedagogy: called");
        match self.record.pedagogies.get_mut(index) {
            Some(entry) => {
                entry.practice = practice;
                true
            }
            None => {
                debug!(len = self.record.pedagogies.len(), "FormState::set_pedagogy: index out of range");
                false
            }
        }
    }

    /// Add or remove a dimension; returns true when it is now selected
    pub fn toggle_dimension(&mut self, dimension: Dimension) -> bool {
        debug!(%dimension, "FormState::toggle_dimension: called");
        toggle(&mut self.record.dimensions, dimension)
    }

    /// Add or remove a KBC theme; returns true when it is now selected
    pub fn toggle_kbc_theme(&mut self, theme: KbcTheme) -> bool {
        debug!(%theme, "FormState::toggle_kbc_theme: called");
        toggle(&mut self.record.kbc_themes, theme)
    }

    /// Select a dimension unless it already is
    pub fn select_dimension(&mut self, dimension: Dimension) {
        if !self.record.dimensions.contains(&dimension) {
            self.toggle_dimension(dimension);
        }
    }

    /// Select a KBC theme unless it already is
    pub fn select_kbc_theme(&mut self, theme: KbcTheme) {
        if !self.record.kbc_themes.contains(&theme) {
            self.toggle_kbc_theme(theme);
        }
    }

    /// Generation may start only once school name and subject are filled in
    pub fn is_submittable(&self) -> bool {
        let ok = !self.record.school_name.is_empty() && !self.record.subject.is_empty();
        debug!(%ok, "FormState::is_submittable: called");
        ok
    }
}
