//! Error types for response resolution.

use intervox_core::error::IntervoxError;

/// Errors from the remote completion endpoint.
///
/// Every variant is absorbed by the response resolver and converted into the
/// generic fallback answer; none propagates to the conversation surface.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport-level failure reaching the endpoint.
    #[error("remote endpoint unreachable: {0}")]
    Unavailable(String),
    /// The endpoint answered with a non-success HTTP status.
    #[error("remote endpoint returned status {0}")]
    BadResponse(u16),
    /// The response payload did not carry the expected generated text.
    #[error("remote response is missing generated text")]
    Malformed,
}

impl From<CompletionError> for IntervoxError {
    fn from(err: CompletionError) -> Self {
        IntervoxError::Completion(err.to_string())
    }
}
