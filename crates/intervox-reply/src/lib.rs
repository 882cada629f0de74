//! Response resolution for the Intervox assistant.
//!
//! Maps free-text input to an answer through ordered canned tables, a single
//! remote completion attempt, and a generic fallback.

pub mod error;
pub mod lexicon;
pub mod remote;
pub mod resolver;

pub use error::CompletionError;
pub use lexicon::{Lexicon, LexiconEntry, MetaRule, Trigger};
pub use remote::{CompletionBackend, HttpCompletionClient};
pub use resolver::{AnswerSource, ResponseResolver};
