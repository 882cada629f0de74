//! Error types for the speech controllers.

use intervox_core::error::IntervoxError;

/// Errors from speech capture and playback.
///
/// None of these is fatal: callers report them (toast-equivalent events,
/// logs) and the controllers always return to a safe idle state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    /// The platform offers no speech-to-text capability.
    #[error("speech-to-text capability is not available")]
    CaptureUnsupported,
    /// Speech capture failed (device, permission, no speech).
    #[error("speech capture failed: {0}")]
    CaptureFailed(String),
    /// The platform offers no text-to-speech capability.
    #[error("text-to-speech capability is not available")]
    PlaybackUnsupported,
    /// Speech playback failed in the synthesis backend.
    #[error("speech playback failed: {0}")]
    PlaybackFailed(String),
}

impl From<SpeechError> for IntervoxError {
    fn from(err: SpeechError) -> Self {
        IntervoxError::Speech(err.to_string())
    }
}
