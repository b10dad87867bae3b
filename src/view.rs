//! Derived render model
//!
//! Projects a state snapshot into the bubble sequence the presentation
//! layer shows. Pure data out; any renderer (the bundled terminal front
//! end included) walks the list top to bottom.

use crate::state_machine::{ConversationState, Phase};

/// Permanent greeting shown before the transcript
pub const GREETING: &str = "Hello! I'm an AI assistant. Ask me anything.";

/// Fixed notice attached to a failed question
pub const REQUEST_FAILED_NOTICE: &str = "Something went wrong. Please ask your question again.";

/// One element of the rendered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bubble<'a> {
    /// Assistant text: the greeting or a completed answer
    Assistant { text: &'a str },
    /// A submitted question
    User { text: &'a str },
    /// Placeholder while the answer is being generated
    Loading,
    /// The fixed failure notice
    ErrorNotice { text: &'static str },
}

/// The full render sequence for a snapshot: greeting, one bubble pair per
/// turn, then the pending question with a loading indicator or the failure
/// notice.
pub fn bubbles(state: &ConversationState) -> Vec<Bubble<'_>> {
    let mut bubbles = vec![Bubble::Assistant { text: GREETING }];

    for turn in &state.transcript {
        bubbles.push(Bubble::User { text: &turn.user });
        bubbles.push(Bubble::Assistant {
            text: &turn.response,
        });
    }

    match &state.phase {
        Phase::Idle => {}
        Phase::Busy { pending } => {
            bubbles.push(Bubble::User { text: pending });
            bubbles.push(Bubble::Loading);
        }
        Phase::Errored { pending } => {
            bubbles.push(Bubble::User { text: pending });
            bubbles.push(Bubble::ErrorNotice {
                text: REQUEST_FAILED_NOTICE,
            });
        }
    }

    bubbles
}
