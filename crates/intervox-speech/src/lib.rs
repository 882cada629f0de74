//! Speech I/O for the Intervox assistant.
//!
//! Wraps the platform speech-to-text and text-to-speech capabilities behind
//! single-slot controllers: capture is guarded (one session at a time),
//! playback is preemptive (a new utterance cancels the current one). Both
//! degrade gracefully when the platform capability is absent.

pub mod capability;
pub mod capture;
pub mod error;
pub mod playback;

pub use capability::{
    Capability, MockRecognizer, MockSynthesizer, SpeechRecognizer, SpeechSynthesizer, Utterance,
};
pub use capture::{CaptureController, CaptureState};
pub use error::SpeechError;
pub use playback::{PlaybackController, PlaybackState};
