//! Error types for the conversation session.

use intervox_core::error::IntervoxError;
use intervox_speech::error::SpeechError;

/// Errors from the conversation orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The submitted text was empty or whitespace-only.
    #[error("message cannot be empty")]
    EmptyMessage,
    /// A previous submission is still being resolved.
    #[error("a response is already in flight")]
    Busy,
    /// The session was torn down.
    #[error("the session has ended")]
    Terminated,
    /// A speech controller reported an error.
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl From<SessionError> for IntervoxError {
    fn from(err: SessionError) -> Self {
        IntervoxError::Session(err.to_string())
    }
}
