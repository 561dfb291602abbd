//! Core error types for the hiring board.
//!
//! Transport-specific errors (HTTP, websocket) are converted to these types by
//! the `connect` crate, so this module stays transport-agnostic.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the board engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A status value outside the closed stage set reached an ingress point.
    /// This is an integration error and is never coerced.
    #[error("Unrecognised kanban status: '{0}'")]
    UnrecognizedStage(String),

    /// A candidate collection violates the per-column density invariant.
    #[error("Candidate data integrity violated: {0}")]
    DataIntegrity(String),

    /// Fetch or persist request failed in the transport collaborator.
    #[error("Gateway request failed: {0}")]
    Gateway(String),

    /// Joining or consuming the realtime topic failed.
    #[error("Realtime channel error: {0}")]
    Realtime(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    /// The session's event queue is gone.
    #[error("Board session is closed")]
    SessionClosed,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create a gateway error
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway(message.into())
    }

    /// Create a realtime error
    pub fn realtime(message: impl Into<String>) -> Self {
        Self::Realtime(message.into())
    }

    /// Whether the error means the client itself is inconsistent and the
    /// session must stop rather than report and carry on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnrecognizedStage(_) | Error::SessionClosed)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Gateway(err.to_string())
    }
}
