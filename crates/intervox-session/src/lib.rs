//! Conversation session management for the Intervox assistant.
//!
//! Ties user intents (submit, toggle capture, mute, language selection,
//! human handoff) to response resolution and the speech controllers, owning
//! the append-only message log and the session lifecycle.

pub mod error;
pub mod orchestrator;

pub use error::SessionError;
pub use orchestrator::ConversationOrchestrator;
