//! Conversation runtime executor

use super::ViewEvent;
use crate::state_machine::{transition, ConversationState, Effect, Event};
use crate::transport::{AnswerService, HistoryEntry};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Single-owner event loop for one conversation.
///
/// Holds the only mutable reference to the conversation state. The
/// transport call is the one suspending operation; it runs as a spawned
/// task and reports back by sending an event into the same stream user
/// submissions arrive on, so no transition can interleave with another.
pub struct ConversationRuntime<C>
where
    C: AnswerService + 'static,
{
    state: ConversationState,
    service: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl<C> ConversationRuntime<C>
where
    C: AnswerService + 'static,
{
    pub fn new(
        service: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        view_tx: broadcast::Sender<ViewEvent>,
    ) -> Self {
        Self {
            state: ConversationState::new(),
            service: Arc::new(service),
            event_rx,
            event_tx,
            view_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("starting conversation runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("conversation runtime stopped");
    }

    /// Apply one event. Rejected events are absorbed: the state is
    /// untouched, no effect runs, and nothing reaches the presentation
    /// layer.
    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(reason = %e, "event rejected");
                return;
            }
        };

        self.state = result.new_state;
        let _ = self.view_tx.send(ViewEvent::Snapshot {
            state: self.state.clone(),
        });

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestAnswer { history } => self.dispatch_request(history),
            Effect::ScrollToLatest => {
                let _ = self.view_tx.send(ViewEvent::ScrollToLatest);
            }
        }
    }

    /// Spawn the transport call. Its resolution comes back as an event so
    /// the loop above stays the only place state changes.
    fn dispatch_request(&self, history: Vec<HistoryEntry>) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match service.generate(&history).await {
                Ok(answer) => Event::AnswerReceived { answer },
                // The transport already logged the specifics; every failure
                // kind folds into the same event here.
                Err(_) => Event::RequestFailed,
            };

            if event_tx.send(event).await.is_err() {
                tracing::warn!("conversation runtime gone before request resolved");
            }
        });
    }
}
