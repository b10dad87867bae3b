//! Runtime for executing a conversation
//!
//! One owning task per conversation: user submissions and transport
//! completions arrive on a single event stream, so every state transition
//! is serialized. The presentation layer listens on a broadcast channel
//! and never mutates anything.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;

use crate::state_machine::{ConversationState, Event};
use crate::transport::AnswerService;
use tokio::sync::{broadcast, mpsc};

/// Events pushed to the presentation layer
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The state changed; re-render from this snapshot
    Snapshot { state: ConversationState },
    /// Bring the newest content into view
    ScrollToLatest,
}

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    event_tx: mpsc::Sender<Event>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl ConversationHandle {
    /// Push an event onto the conversation stream
    pub async fn send_event(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("conversation runtime gone: {e}"))
    }

    /// Subscribe to presentation updates
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.view_tx.subscribe()
    }
}

/// Spawn a conversation runtime with an empty transcript and return the
/// handle used to talk to it. The runtime lives until the process exits.
pub fn spawn<C>(service: C) -> ConversationHandle
where
    C: AnswerService + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let (view_tx, _) = broadcast::channel(128);

    let runtime = ConversationRuntime::new(service, event_rx, event_tx.clone(), view_tx.clone());
    tokio::spawn(runtime.run());

    ConversationHandle { event_tx, view_tx }
}
