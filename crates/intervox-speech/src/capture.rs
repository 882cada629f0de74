//! Speech capture controller.
//!
//! Single-slot state machine wrapping the speech-to-text capability:
//! `Idle -> Listening -> Idle` on result, error, or stop. At most one capture
//! session exists at a time; a capture request while one is listening is a
//! guarded no-op, never a second session.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::capability::{Capability, SpeechRecognizer};
use crate::error::SpeechError;

/// Operational state of the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture in progress. Ready to start.
    Idle,
    /// Actively listening for a single utterance.
    Listening,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Listening => write!(f, "Listening"),
        }
    }
}

/// Controller serializing access to the speech-to-text capability.
pub struct CaptureController {
    recognizer: Capability<dyn SpeechRecognizer>,
    state: Mutex<CaptureState>,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl CaptureController {
    /// Create a controller over the given capability.
    pub fn new(recognizer: Capability<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state: Mutex::new(CaptureState::Idle),
            cancel: Mutex::new(None),
        }
    }

    /// Whether the platform offers speech-to-text at all.
    pub fn is_supported(&self) -> bool {
        self.recognizer.is_available()
    }

    /// Returns the current capture state.
    pub fn state(&self) -> CaptureState {
        *self.state.lock().expect("capture state mutex poisoned")
    }

    /// Whether a capture session is currently listening.
    pub fn is_listening(&self) -> bool {
        self.state() == CaptureState::Listening
    }

    /// Run one bounded capture attempt in the given locale.
    ///
    /// Returns `Ok(Some(transcript))` on a recognized utterance, `Ok(None)`
    /// when the session was stopped before completion or when a session is
    /// already listening (guarded re-entry), and `Err` when the capability is
    /// absent or recognition fails. The controller is back at `Idle` on every
    /// return path. The locale is read once per call; changing the selection
    /// affects only the next capture.
    pub async fn capture(&self, locale: &str) -> Result<Option<String>, SpeechError> {
        let recognizer = match self.recognizer.get() {
            Some(r) => Arc::clone(r),
            None => return Err(SpeechError::CaptureUnsupported),
        };

        {
            let mut state = self.state.lock().expect("capture state mutex poisoned");
            if *state == CaptureState::Listening {
                tracing::debug!("Capture already listening, ignoring re-entry");
                return Ok(None);
            }
            *state = CaptureState::Listening;
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.cancel.lock().expect("capture cancel mutex poisoned") = Some(cancel_tx);

        // Resets to Idle on every exit path, including task cancellation.
        let _guard = SessionGuard(self);

        tracing::debug!(locale, "Capture session listening");

        tokio::select! {
            result = recognizer.recognize(locale) => match result {
                Ok(transcript) => {
                    tracing::debug!(transcript_len = transcript.len(), "Capture session recognized utterance");
                    Ok(Some(transcript))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Capture session failed");
                    Err(e)
                }
            },
            _ = cancel_rx => {
                tracing::debug!("Capture session stopped");
                Ok(None)
            }
        }
    }

    /// Force the active session to end. No-op when idle.
    pub fn stop(&self) {
        if let Some(tx) = self
            .cancel
            .lock()
            .expect("capture cancel mutex poisoned")
            .take()
        {
            let _ = tx.send(());
        }
    }
}

/// Restores the controller to `Idle` when the capture call ends.
struct SessionGuard<'a>(&'a CaptureController);

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        *self
            .0
            .cancel
            .lock()
            .expect("capture cancel mutex poisoned") = None;
        *self.0.state.lock().expect("capture state mutex poisoned") = CaptureState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
