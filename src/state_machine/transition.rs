//! Pure state transition function

use super::{ConversationState, Effect, Event, Phase, Turn};
use crate::transport::HistoryEntry;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition.
///
/// The runtime absorbs every variant: a rejected event leaves the state
/// untouched and produces no effects, so the user observes a no-op.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("request already in flight, submission refused")]
    RequestInFlight,
    #[error("blank question refused")]
    BlankQuestion,
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// Given the same state and event this always produces the same new state
/// and effects, with no I/O.
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (&state.phase, event) {
        // Blank submissions are refused regardless of phase. The gate trims
        // before emitting; this re-check keeps the machine safe on its own.
        (_, Event::Submit { text }) if text.trim().is_empty() => {
            Err(TransitionError::BlankQuestion)
        }

        // Idle/Errored + Submit -> Busy. A submit out of Errored abandons
        // the failed question: it is not retried and never enters the
        // transcript.
        (Phase::Idle | Phase::Errored { .. }, Event::Submit { text }) => {
            let history = build_history(&state.transcript, &text);
            Ok(TransitionResult::new(ConversationState {
                transcript: state.transcript.clone(),
                phase: Phase::Busy { pending: text },
            })
            .with_effect(Effect::RequestAnswer { history })
            .with_effect(Effect::ScrollToLatest))
        }

        // The gate refuses to emit while a request is outstanding; this
        // guard keeps the machine safe even if a submit slips through.
        (Phase::Busy { .. }, Event::Submit { .. }) => Err(TransitionError::RequestInFlight),

        // Busy + AnswerReceived -> Idle, completing the pending turn
        (Phase::Busy { pending }, Event::AnswerReceived { answer }) => {
            let mut transcript = state.transcript.clone();
            transcript.push(Turn::new(pending.clone(), answer));
            Ok(TransitionResult::new(ConversationState {
                transcript,
                phase: Phase::Idle,
            })
            .with_effect(Effect::ScrollToLatest))
        }

        // Busy + RequestFailed -> Errored, pending retained for redisplay
        (Phase::Busy { pending }, Event::RequestFailed) => {
            Ok(TransitionResult::new(ConversationState {
                transcript: state.transcript.clone(),
                phase: Phase::Errored {
                    pending: pending.clone(),
                },
            })
            .with_effect(Effect::ScrollToLatest))
        }

        // Transport completions can only arrive while Busy; anything else
        // is a stray event.
        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "no transition from {phase:?} with {event:?}"
        ))),
    }
}

/// Serialize the conversation so far plus the new question into the request
/// payload. Only the newest entry carries no assistant text.
fn build_history(transcript: &[Turn], question: &str) -> Vec<HistoryEntry> {
    let mut history: Vec<HistoryEntry> = transcript
        .iter()
        .map(|turn| HistoryEntry {
            user: turn.user.clone(),
            assistant: Some(turn.response.clone()),
        })
        .collect();
    history.push(HistoryEntry {
        user: question.to_string(),
        assistant: None,
    });
    history
}
