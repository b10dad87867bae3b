//! Conversation state types

use serde::{Deserialize, Serialize};

/// One completed user/assistant exchange.
///
/// A `Turn` enters the transcript only once both sides are known; a question
/// that is still in flight (or failed) lives in [`Phase`], not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub response: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            response: response.into(),
        }
    }
}

/// Where the conversation is in the request lifecycle.
///
/// The pending question is carried inside the `Busy` and `Errored` variants,
/// so "pending set iff a request is outstanding or failed" holds by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    /// Ready for input, no outstanding request
    #[default]
    Idle,

    /// Request in flight
    Busy { pending: String },

    /// Last request failed; the question is retained for redisplay
    Errored { pending: String },
}

impl Phase {
    /// Check if a request is currently outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Busy { .. })
    }

    /// The most recently submitted question not yet resolved to a turn
    #[allow(dead_code)] // State query utility
    pub fn pending(&self) -> Option<&str> {
        match self {
            Phase::Idle => None,
            Phase::Busy { pending } | Phase::Errored { pending } => Some(pending),
        }
    }
}

/// Process-lifetime conversation state, owned by the runtime.
///
/// Created empty when the interface mounts; mutated only through
/// [`transition`](super::transition); never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConversationState {
    /// Completed exchanges in submission order. Append-only.
    pub transcript: Vec<Turn>,
    pub phase: Phase,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }
}
