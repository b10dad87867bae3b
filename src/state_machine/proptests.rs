//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Question text that survives trimming
fn arb_question() -> impl Strategy<Value = String> {
    "[ ]{0,2}[a-zA-Z0-9][a-zA-Z0-9 ?!.]{0,28}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[ \t\n]{1,6}"]
}

fn arb_answer() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!]{0,40}"
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (arb_question(), arb_answer()).prop_map(|(user, response)| Turn { user, response })
}

fn arb_transcript() -> impl Strategy<Value = Vec<Turn>> {
    proptest::collection::vec(arb_turn(), 0..4)
}

fn arb_idle_state() -> impl Strategy<Value = ConversationState> {
    arb_transcript().prop_map(|transcript| ConversationState {
        transcript,
        phase: Phase::Idle,
    })
}

fn arb_busy_state() -> impl Strategy<Value = ConversationState> {
    (arb_transcript(), arb_question()).prop_map(|(transcript, pending)| ConversationState {
        transcript,
        phase: Phase::Busy { pending },
    })
}

fn arb_errored_state() -> impl Strategy<Value = ConversationState> {
    (arb_transcript(), arb_question()).prop_map(|(transcript, pending)| ConversationState {
        transcript,
        phase: Phase::Errored { pending },
    })
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    prop_oneof![arb_idle_state(), arb_busy_state(), arb_errored_state()]
}

/// One step of a randomly scripted session
#[derive(Debug, Clone)]
enum Step {
    SubmitValid(String),
    SubmitBlank(String),
    Complete(String),
    Fail,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_question().prop_map(Step::SubmitValid),
        arb_blank().prop_map(Step::SubmitBlank),
        arb_answer().prop_map(Step::Complete),
        Just(Step::Fail),
    ]
}

fn arb_script() -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec(arb_step(), 0..20)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Blank submissions never change anything, whatever the phase.
    #[test]
    fn blank_submit_never_changes_state(state in arb_state(), text in arb_blank()) {
        let result = transition(&state, Event::Submit { text });
        prop_assert!(matches!(result, Err(TransitionError::BlankQuestion)));
    }

    /// Submitting while a request is outstanding is refused: no state
    /// change, no effects, no second request.
    #[test]
    fn submit_while_busy_is_refused(state in arb_busy_state(), text in arb_question()) {
        let result = transition(&state, Event::Submit { text });
        prop_assert!(matches!(result, Err(TransitionError::RequestInFlight)));
    }

    /// A failed request keeps the pending question and leaves the
    /// transcript untouched.
    #[test]
    fn failure_retains_pending(state in arb_busy_state()) {
        let pending_before = state.phase.pending().unwrap().to_string();
        let result = transition(&state, Event::RequestFailed).unwrap();

        prop_assert_eq!(
            result.new_state.phase,
            Phase::Errored { pending: pending_before }
        );
        prop_assert_eq!(&result.new_state.transcript, &state.transcript);
    }

    /// A successful request appends exactly one turn for the pending
    /// question; earlier turns are untouched.
    #[test]
    fn success_appends_one_turn(state in arb_busy_state(), answer in arb_answer()) {
        let pending_before = state.phase.pending().unwrap().to_string();
        let result = transition(&state, Event::AnswerReceived { answer: answer.clone() }).unwrap();

        prop_assert_eq!(&result.new_state.phase, &Phase::Idle);
        prop_assert_eq!(result.new_state.transcript.len(), state.transcript.len() + 1);
        prop_assert_eq!(
            &result.new_state.transcript[..state.transcript.len()],
            &state.transcript[..]
        );
        let last = result.new_state.transcript.last().unwrap();
        prop_assert_eq!(&last.user, &pending_before);
        prop_assert_eq!(&last.response, &answer);
    }

    /// The request payload mirrors the transcript in order and ends with
    /// the new question as the only entry without an assistant side.
    #[test]
    fn request_payload_mirrors_transcript(
        transcript in arb_transcript(),
        question in arb_question(),
    ) {
        let state = ConversationState { transcript: transcript.clone(), phase: Phase::Idle };
        let result = transition(&state, Event::Submit { text: question.clone() }).unwrap();

        let Effect::RequestAnswer { history } = &result.effects[0] else {
            panic!("first effect should be the request");
        };
        prop_assert_eq!(history.len(), transcript.len() + 1);
        for (entry, turn) in history.iter().zip(&transcript) {
            prop_assert_eq!(&entry.user, &turn.user);
            prop_assert_eq!(entry.assistant.as_ref(), Some(&turn.response));
        }
        let newest = history.last().unwrap();
        prop_assert_eq!(&newest.user, &question);
        prop_assert!(newest.assistant.is_none());
    }

    /// Every transition into Busy signals a scroll so the in-flight
    /// placeholder becomes visible.
    #[test]
    fn entering_busy_scrolls(
        state in prop_oneof![arb_idle_state(), arb_errored_state()],
        question in arb_question(),
    ) {
        let result = transition(&state, Event::Submit { text: question }).unwrap();
        prop_assert!(result.new_state.phase.is_busy());
        prop_assert!(result.effects.contains(&Effect::ScrollToLatest));
    }

    /// Random sessions: the transcript grows by exactly one turn per
    /// resolved request, in submission order, and rejected events change
    /// nothing.
    #[test]
    fn scripted_sessions_hold_invariants(script in arb_script()) {
        let mut state = ConversationState::new();
        let mut resolved: Vec<(String, String)> = vec![];

        for step in script {
            let event = match &step {
                Step::SubmitValid(q) | Step::SubmitBlank(q) => Event::Submit { text: q.clone() },
                Step::Complete(a) => Event::AnswerReceived { answer: a.clone() },
                Step::Fail => Event::RequestFailed,
            };

            let before = state.clone();
            match transition(&state, event) {
                Ok(result) => {
                    if let (Phase::Busy { pending }, Step::Complete(a)) = (&before.phase, &step) {
                        resolved.push((pending.clone(), a.clone()));
                    }
                    // Append-only: the old transcript is always a prefix.
                    prop_assert_eq!(
                        &result.new_state.transcript[..before.transcript.len()],
                        &before.transcript[..]
                    );
                    state = result.new_state;
                }
                Err(_) => {
                    // Rejected events must not have touched the state.
                    prop_assert_eq!(&state, &before);
                }
            }
        }

        prop_assert_eq!(state.transcript.len(), resolved.len());
        for (turn, (user, response)) in state.transcript.iter().zip(&resolved) {
            prop_assert_eq!(&turn.user, user);
            prop_assert_eq!(&turn.response, response);
        }
    }
}
