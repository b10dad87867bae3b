//! Transport error types

use thiserror::Error;

/// Failure of an answer request.
///
/// The variants exist for log fidelity only: the runtime folds every one of
/// them into the same failed-request event, and the state machine never sees
/// the distinction.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed answer payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
