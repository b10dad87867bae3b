//! Wire types for the answer service

use serde::{Deserialize, Serialize};

/// One entry of the request payload: a completed exchange, or — for the
/// newest entry only — the question currently being answered.
///
/// `assistant` is omitted from the serialized JSON when absent; the service
/// distinguishes the open question by the missing key, not a null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
}

/// Response body of the answer service. Fields beyond `answer` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
}
