//! Events that drive the conversation state machine

/// Events processed on the single conversation stream.
///
/// User submissions and transport completions arrive on the same serialized
/// stream, so no two transitions can interleave.
#[derive(Debug, Clone)]
pub enum Event {
    /// A validated question from the submission gate
    Submit { text: String },

    /// The transport resolved the outstanding request with an answer
    AnswerReceived { answer: String },

    /// The outstanding request failed. Network errors, bad statuses and
    /// unparseable bodies all collapse into this one event.
    RequestFailed,
}
