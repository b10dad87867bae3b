//! Effects produced by state transitions

use crate::transport::HistoryEntry;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch the answer request carrying the conversation so far plus the
    /// new question
    RequestAnswer { history: Vec<HistoryEntry> },

    /// Tell the presentation layer to scroll to the newest content
    ScrollToLatest,
}
