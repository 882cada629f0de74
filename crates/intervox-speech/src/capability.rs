//! Platform speech capability abstraction.
//!
//! The presence of speech-to-text and text-to-speech is a runtime property of
//! the host platform. `Capability` makes the presence check explicit, and the
//! backend traits abstract the actual platform services so the controllers
//! behave identically whether a concrete backend exists or not. Mock backends
//! live here so tests and headless builds can exercise the full flow.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SpeechError;

// =============================================================================
// Utterance
// =============================================================================

/// A synthesized speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 locale tag the voice should use.
    pub locale: String,
    /// Playback rate. 1.0 is normal speed.
    pub rate: f32,
    /// Playback pitch. 1.0 is normal pitch.
    pub pitch: f32,
}

impl Utterance {
    /// Create an utterance at normal rate and pitch.
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: locale.into(),
            rate: 1.0,
            pitch: 1.0,
        }
    }

    /// Override the playback rate.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    /// Override the playback pitch.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

// =============================================================================
// Backend traits
// =============================================================================

/// Platform speech-to-text service.
///
/// One call is one bounded capture session: a single utterance, no interim
/// results, configured with the given locale. The call resolves with the
/// final transcript or an error; dropping the future ends the session.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, locale: &str) -> Result<String, SpeechError>;
}

/// Platform text-to-speech service.
///
/// One call synthesizes and plays one utterance to completion; dropping the
/// future cancels the playback.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

// =============================================================================
// Capability provider
// =============================================================================

/// Presence or absence of a platform capability.
///
/// Controllers are constructed over a `Capability` and degrade gracefully
/// when the backend is `Unavailable`.
pub enum Capability<T: ?Sized> {
    Available(Arc<T>),
    Unavailable,
}

impl<T: ?Sized> Capability<T> {
    /// Whether a backend is present.
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    /// Borrow the backend handle, if present.
    pub fn get(&self) -> Option<&Arc<T>> {
        match self {
            Capability::Available(handle) => Some(handle),
            Capability::Unavailable => None,
        }
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Capability::Available(handle) => Capability::Available(Arc::clone(handle)),
            Capability::Unavailable => Capability::Unavailable,
        }
    }
}

// =============================================================================
// Mock backends
// =============================================================================

/// Mock recognizer for testing and headless platforms.
///
/// Returns a fixed transcript after a configurable delay, or a capture
/// failure when constructed with `failing`.
pub struct MockRecognizer {
    transcript: String,
    delay: Duration,
    fail: bool,
}

impl MockRecognizer {
    /// Recognizer that immediately yields the given transcript.
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    /// Delay recognition by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Recognizer that always fails with a capture error.
    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            delay: Duration::ZERO,
            fail: true,
        }
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self, _locale: &str) -> Result<String, SpeechError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            Err(SpeechError::CaptureFailed("no speech detected".to_string()))
        } else {
            Ok(self.transcript.clone())
        }
    }
}

/// Mock synthesizer that records utterances.
///
/// `started` records every utterance handed to the backend; `completed`
/// records only those that played through the configured delay without being
/// cancelled, which is what preemption tests assert on.
pub struct MockSynthesizer {
    delay: Duration,
    started: Mutex<Vec<Utterance>>,
    completed: Mutex<Vec<Utterance>>,
}

impl MockSynthesizer {
    /// Synthesizer whose playback completes immediately.
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    /// Synthesizer whose playback takes the given duration.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            started: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Utterances whose playback was started.
    pub fn started(&self) -> Vec<Utterance> {
        self.started.lock().expect("started mutex poisoned").clone()
    }

    /// Utterances whose playback ran to completion.
    pub fn completed(&self) -> Vec<Utterance> {
        self.completed
            .lock()
            .expect("completed mutex poisoned")
            .clone()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.started
            .lock()
            .expect("started mutex poisoned")
            .push(utterance.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed
            .lock()
            .expect("completed mutex poisoned")
            .push(utterance.clone());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
