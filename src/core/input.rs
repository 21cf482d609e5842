//! # Input Buffer
//!
//! The user's draft and the rules deciding whether it may be submitted.
//! Cursor handling and wrapping are presentation concerns and live in the
//! TUI's input box.

use crate::core::lifecycle::LifecycleState;

/// Draft text being composed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the draft.
    pub fn update(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empties the draft. Called only once a submission has been accepted.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// True when the draft is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Submission gate: non-blank draft and no exchange outstanding.
    pub fn can_submit(&self, state: LifecycleState) -> bool {
        !self.is_blank() && !state.is_in_flight()
    }
}

/// What the commit key (Enter) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKey {
    /// Plain press: submit the draft, no newline.
    Submit,
    /// Shift-like modifier held: ordinary newline, no submit.
    InsertNewline,
}

impl CommitKey {
    /// Shift and Alt both count as "shift-like"; some terminals only
    /// report one of them for a modified Enter.
    pub fn from_modifiers(shift: bool, alt: bool) -> Self {
        if shift || alt {
            CommitKey::InsertNewline
        } else {
            CommitKey::Submit
        }
    }
}
