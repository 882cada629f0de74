//! Speech playback controller.
//!
//! Single-slot wrapper over the text-to-speech capability. A new `speak`
//! preempts any in-flight utterance rather than queueing behind it; `stop`
//! is idempotent. An absent capability reports `PlaybackUnsupported`, which
//! callers surface as a notification rather than an error.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::capability::{Capability, SpeechSynthesizer, Utterance};
use crate::error::SpeechError;

/// Operational state of the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No utterance queued or playing.
    Idle,
    /// An utterance is being synthesized and played.
    Speaking,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "Idle"),
            PlaybackState::Speaking => write!(f, "Speaking"),
        }
    }
}

/// Controller serializing access to the text-to-speech capability.
pub struct PlaybackController {
    synthesizer: Capability<dyn SpeechSynthesizer>,
    state: Mutex<PlaybackState>,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
    // Bumped by each speak; lets a preempted call skip the cleanup that now
    // belongs to its successor.
    generation: AtomicU64,
    rate: f32,
    pitch: f32,
}

impl PlaybackController {
    /// Create a controller over the given capability at normal rate/pitch.
    pub fn new(synthesizer: Capability<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            state: Mutex::new(PlaybackState::Idle),
            cancel: Mutex::new(None),
            generation: AtomicU64::new(0),
            rate: 1.0,
            pitch: 1.0,
        }
    }

    /// Override the fixed voice rate and pitch.
    pub fn with_voice(mut self, rate: f32, pitch: f32) -> Self {
        self.rate = rate;
        self.pitch = pitch;
        self
    }

    /// Whether the platform offers text-to-speech at all.
    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_available()
    }

    /// Returns the current playback state.
    pub fn state(&self) -> PlaybackState {
        *self.state.lock().expect("playback state mutex poisoned")
    }

    /// Whether an utterance is currently playing.
    pub fn is_speaking(&self) -> bool {
        self.state() == PlaybackState::Speaking
    }

    /// Synthesize and play `text` in `locale`, preempting any in-flight
    /// utterance.
    ///
    /// Resolves when playback finishes or is itself preempted/stopped (both
    /// count as a normal end). `Err(PlaybackUnsupported)` when the capability
    /// is absent.
    pub async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        let synthesizer = match self.synthesizer.get() {
            Some(s) => Arc::clone(s),
            None => return Err(SpeechError::PlaybackUnsupported),
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Preempt: cancel whatever is in flight before taking the slot.
        self.stop();

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.cancel.lock().expect("playback cancel mutex poisoned") = Some(cancel_tx);
        *self.state.lock().expect("playback state mutex poisoned") = PlaybackState::Speaking;

        let _guard = SlotGuard {
            controller: self,
            generation,
        };

        let utterance = Utterance::new(text, locale)
            .with_rate(self.rate)
            .with_pitch(self.pitch);
        tracing::debug!(locale, text_len = text.len(), "Playback started");

        tokio::select! {
            result = synthesizer.speak(&utterance) => {
                if let Err(ref e) = result {
                    tracing::debug!(error = %e, "Playback backend failed");
                }
                result
            }
            _ = cancel_rx => {
                tracing::debug!("Playback preempted or stopped");
                Ok(())
            }
        }
    }

    /// Cancel in-flight playback, if any. Idempotent when idle.
    pub fn stop(&self) {
        if let Some(tx) = self
            .cancel
            .lock()
            .expect("playback cancel mutex poisoned")
            .take()
        {
            let _ = tx.send(());
        }
    }
}

/// Releases the playback slot unless a newer utterance already took it.
struct SlotGuard<'a> {
    controller: &'a PlaybackController,
    generation: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.controller.generation.load(Ordering::SeqCst) == self.generation {
            *self
                .controller
                .cancel
                .lock()
                .expect("playback cancel mutex poisoned") = None;
            *self
                .controller
                .state
                .lock()
                .expect("playback state mutex poisoned") = PlaybackState::Idle;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
