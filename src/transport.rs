//! Request/response boundary to the answer-generation service
//!
//! The service is an external collaborator: the conversation core hands it
//! the serialized history and gets back either an answer string or a
//! failure. Nothing else crosses this seam.

mod error;
mod http;
mod types;

pub use error::TransportError;
pub use http::HttpAnswerService;
pub use types::{AnswerPayload, HistoryEntry};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface to the answer-generation service
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Resolve the conversation-so-far (newest entry without an assistant
    /// side) to an answer for that newest question.
    async fn generate(&self, history: &[HistoryEntry]) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn generate(&self, history: &[HistoryEntry]) -> Result<String, TransportError> {
        (**self).generate(history).await
    }
}
