//! Shared kernel for the Intervox assistant: errors, configuration, domain
//! types, and the observable session event surface.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::IntervoxConfig;
pub use error::{IntervoxError, Result};
pub use events::SessionEvent;
pub use types::{Language, Message, Sender};
