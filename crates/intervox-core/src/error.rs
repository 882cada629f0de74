use thiserror::Error;

/// Top-level error type for the Intervox system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for IntervoxError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntervoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for IntervoxError {
    fn from(err: toml::de::Error) -> Self {
        IntervoxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for IntervoxError {
    fn from(err: toml::ser::Error) -> Self {
        IntervoxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for IntervoxError {
    fn from(err: serde_json::Error) -> Self {
        IntervoxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Intervox operations.
pub type Result<T> = std::result::Result<T, IntervoxError>;
