//! Input submission gate
//!
//! Converts raw edit events into validated submit messages: no blank
//! submission, no resubmission while a request is outstanding, no premature
//! submission from a confirm key fired mid-composition. The gate owns only
//! the draft; everything it emits is a [`Event::Submit`] message.

use crate::state_machine::Event;

#[derive(Debug, Default)]
pub struct InputGate {
    draft: String,
    composing: bool,
    busy: bool,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Mirror of the controller's busy flag. An error re-enables
    /// submission, so this tracks "request in flight", not "not idle".
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // Draft edits are always allowed, busy or not.

    pub fn insert(&mut self, ch: char) {
        self.draft.push(ch);
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    #[allow(dead_code)] // Useful for tests and paste handling
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// A multi-keystroke composition sequence began; the confirm key now
    /// doubles as the candidate-accept key and must not submit.
    #[allow(dead_code)] // Terminal key streams carry no composition signal
    pub fn composition_started(&mut self) {
        self.composing = true;
    }

    #[allow(dead_code)] // Terminal key streams carry no composition signal
    pub fn composition_ended(&mut self) {
        self.composing = false;
    }

    /// Confirm-key submission. Suppressed while busy, while a composition
    /// sequence is active, and when the shift modifier is held — the caller
    /// decides what a shifted confirm does instead (typically a line
    /// break); the gate never synthesizes one.
    pub fn confirm_key(&mut self, shift_held: bool) -> Option<Event> {
        if self.busy || self.composing || shift_held {
            return None;
        }
        self.emit()
    }

    /// Explicit send action (a button, a menu entry). Composition state
    /// does not apply here.
    #[allow(dead_code)] // For front ends with a send button
    pub fn send_clicked(&mut self) -> Option<Event> {
        if self.busy {
            return None;
        }
        self.emit()
    }

    /// Validate and emit. The draft resets the moment the message is
    /// emitted, before the request resolves; a failed request does not
    /// restore it.
    fn emit(&mut self) -> Option<Event> {
        let trimmed = self.draft.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.draft.clear();
        Some(Event::Submit { text })
    }
}
