use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Sender;

/// Observable notifications emitted by the conversation session.
///
/// Events are emitted after state changes and consumed by the UI collaborator
/// (toast notifications, status indicators) and the log. They are
/// informational: no event requires a response, and dropping them is safe.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SessionEvent {
    /// A message was appended to the conversation log.
    MessageAppended { id: Uuid, sender: Sender },

    /// A speech capture session started listening.
    CaptureStarted { locale: String },

    /// The active speech capture session ended (transcript or stop).
    CaptureEnded,

    /// Speech capture failed (device, permission, no speech).
    CaptureFailed { reason: String },

    /// Speech capture was requested but no speech-to-text capability exists.
    CaptureUnsupported,

    /// Playback of a bot reply started.
    PlaybackStarted { locale: String },

    /// Playback was stopped or preempted.
    PlaybackStopped,

    /// Playback was requested but no text-to-speech capability exists.
    PlaybackUnsupported,

    /// The remote completion call failed and the generic fallback was used.
    CompletionFallback { reason: String },

    /// The selected language changed.
    LanguageChanged { code: String },

    /// The mute flag changed.
    MuteChanged { muted: bool },

    /// The session was torn down.
    SessionEnded,
}

impl SessionEvent {
    /// Returns a stable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::MessageAppended { .. } => "message_appended",
            SessionEvent::CaptureStarted { .. } => "capture_started",
            SessionEvent::CaptureEnded => "capture_ended",
            SessionEvent::CaptureFailed { .. } => "capture_failed",
            SessionEvent::CaptureUnsupported => "capture_unsupported",
            SessionEvent::PlaybackStarted { .. } => "playback_started",
            SessionEvent::PlaybackStopped => "playback_stopped",
            SessionEvent::PlaybackUnsupported => "playback_unsupported",
            SessionEvent::CompletionFallback { .. } => "completion_fallback",
            SessionEvent::LanguageChanged { .. } => "language_changed",
            SessionEvent::MuteChanged { .. } => "mute_changed",
            SessionEvent::SessionEnded => "session_ended",
        }
    }
}
