//! Mock transports and integration tests for the runtime
//!
//! The mocks enable driving the full event loop without real I/O.

use super::*;
use crate::state_machine::{ConversationState, Event, Phase, Turn};
use crate::transport::{AnswerService, HistoryEntry, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{broadcast, Notify};

// ============================================================================
// Mock Answer Service
// ============================================================================

/// Mock answer service that returns queued results
pub struct MockAnswerService {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    /// Record of all request payloads
    pub requests: Mutex<Vec<Vec<HistoryEntry>>>,
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(answer.into()));
    }

    /// Queue a failure
    pub fn queue_failure(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )));
    }

    /// Get recorded request payloads
    pub fn recorded_requests(&self) -> Vec<Vec<HistoryEntry>> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<String, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                ))
            })
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn generate(&self, history: &[HistoryEntry]) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(history.to_vec());
        self.next_response()
    }
}

// ============================================================================
// Blocked Mock Answer Service (for overlapping-submit tests)
// ============================================================================

/// Mock answer service that holds each request until released
pub struct BlockedMockAnswerService {
    inner: MockAnswerService,
    /// Notified when a request reaches the service (for test
    /// synchronization)
    pub request_started: Notify,
    release: Notify,
}

impl BlockedMockAnswerService {
    pub fn new() -> Self {
        Self {
            inner: MockAnswerService::new(),
            request_started: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.inner.queue_answer(answer);
    }

    pub fn recorded_requests(&self) -> Vec<Vec<HistoryEntry>> {
        self.inner.recorded_requests()
    }

    /// Let one held request resolve
    pub fn release_one(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl AnswerService for BlockedMockAnswerService {
    async fn generate(&self, history: &[HistoryEntry]) -> Result<String, TransportError> {
        self.inner.requests.lock().unwrap().push(history.to_vec());
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_response()
    }
}

// ============================================================================
// Integration tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn submit(text: &str) -> Event {
        Event::Submit {
            text: text.to_string(),
        }
    }

    /// Next broadcast event, failing the test instead of hanging
    async fn next_event(rx: &mut broadcast::Receiver<ViewEvent>) -> ViewEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a view event")
            .expect("view channel closed")
    }

    /// Skip scroll signals until the next snapshot
    async fn next_snapshot(rx: &mut broadcast::Receiver<ViewEvent>) -> ConversationState {
        loop {
            if let ViewEvent::Snapshot { state } = next_event(rx).await {
                return state;
            }
        }
    }

    /// Skip forward to the next snapshot whose phase is not busy
    async fn next_settled(rx: &mut broadcast::Receiver<ViewEvent>) -> ConversationState {
        loop {
            let state = next_snapshot(rx).await;
            if !state.phase.is_busy() {
                return state;
            }
        }
    }

    #[tokio::test]
    async fn successful_submission_appends_turn() {
        let mock = Arc::new(MockAnswerService::new());
        mock.queue_answer("Hi there");

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();
        handle.send_event(submit("Hello")).await.unwrap();

        // Busy snapshot first (with its scroll signal), then the resolution.
        let busy = next_snapshot(&mut rx).await;
        assert_eq!(
            busy.phase,
            Phase::Busy {
                pending: "Hello".to_string()
            }
        );
        assert!(matches!(
            next_event(&mut rx).await,
            ViewEvent::ScrollToLatest
        ));

        let settled = next_settled(&mut rx).await;
        assert_eq!(settled.phase, Phase::Idle);
        assert_eq!(settled.transcript, vec![Turn::new("Hello", "Hi there")]);
    }

    #[tokio::test]
    async fn failed_submission_keeps_question_out_of_transcript() {
        let mock = Arc::new(MockAnswerService::new());
        mock.queue_failure();

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();
        handle.send_event(submit("Hello")).await.unwrap();

        let settled = next_settled(&mut rx).await;
        assert_eq!(
            settled.phase,
            Phase::Errored {
                pending: "Hello".to_string()
            }
        );
        assert!(settled.transcript.is_empty());
    }

    #[tokio::test]
    async fn blank_submission_changes_nothing() {
        let mock = Arc::new(MockAnswerService::new());
        mock.queue_answer("real answer");

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();

        handle.send_event(submit("   ")).await.unwrap();
        handle.send_event(submit("real question")).await.unwrap();

        // The blank submit produced no snapshot and no request; the first
        // thing observed is the valid question going busy.
        let busy = next_snapshot(&mut rx).await;
        assert_eq!(
            busy.phase,
            Phase::Busy {
                pending: "real question".to_string()
            }
        );

        let settled = next_settled(&mut rx).await;
        assert_eq!(settled.transcript.len(), 1);
        assert_eq!(mock.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn submit_while_busy_issues_no_second_request() {
        let mock = Arc::new(BlockedMockAnswerService::new());
        mock.queue_answer("first answer");

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();

        handle.send_event(submit("first")).await.unwrap();
        mock.request_started.notified().await;

        // Arrives while the request is held open: must be a no-op.
        handle.send_event(submit("second")).await.unwrap();
        mock.release_one();

        let settled = next_settled(&mut rx).await;
        assert_eq!(settled.phase, Phase::Idle);
        assert_eq!(settled.transcript, vec![Turn::new("first", "first answer")]);
        assert_eq!(mock.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn second_request_payload_carries_first_turn() {
        let mock = Arc::new(MockAnswerService::new());
        mock.queue_answer("answer-to-A");
        mock.queue_answer("answer-to-B");

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();

        handle.send_event(submit("A")).await.unwrap();
        next_settled(&mut rx).await;
        handle.send_event(submit("B")).await.unwrap();
        let settled = next_settled(&mut rx).await;

        assert_eq!(
            settled.transcript,
            vec![Turn::new("A", "answer-to-A"), Turn::new("B", "answer-to-B")]
        );

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1],
            vec![
                HistoryEntry {
                    user: "A".to_string(),
                    assistant: Some("answer-to-A".to_string()),
                },
                HistoryEntry {
                    user: "B".to_string(),
                    assistant: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn resubmit_after_error_discards_failed_question() {
        let mock = Arc::new(MockAnswerService::new());
        mock.queue_failure();
        mock.queue_answer("fresh answer");

        let handle = spawn(Arc::clone(&mock));
        let mut rx = handle.subscribe();

        handle.send_event(submit("doomed")).await.unwrap();
        let errored = next_settled(&mut rx).await;
        assert_eq!(
            errored.phase,
            Phase::Errored {
                pending: "doomed".to_string()
            }
        );

        handle.send_event(submit("fresh")).await.unwrap();
        let settled = next_settled(&mut rx).await;

        assert_eq!(settled.transcript, vec![Turn::new("fresh", "fresh answer")]);

        // The abandoned question never appears in a later payload.
        let requests = mock.recorded_requests();
        assert_eq!(
            requests[1],
            vec![HistoryEntry {
                user: "fresh".to_string(),
                assistant: None,
            }]
        );
    }
}
