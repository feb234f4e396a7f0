//! Error types for the session manager.

use thiserror::Error;

/// A connection request was missing a field or carried a malformed value.
///
/// Always recovered locally: the message is shown inline in the connection
/// dialog and no session state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Host, port, and user are required fields.")]
    MissingFields,

    #[error("Port must be a positive integer: {0:?}")]
    InvalidPort(String),

    #[error("Could not read private key file {path}: {reason}")]
    PrivateKeyFile { path: String, reason: String },
}

/// Failure raised by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("transport is closed")]
    Closed,

    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_matches_dialog_text() {
        let err = ValidationError::MissingFields;
        assert_eq!(err.to_string(), "Host, port, and user are required fields.");
    }

    #[test]
    fn validation_converts_into_crate_error() {
        let err: Error = ValidationError::InvalidPort("abc".into()).into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("abc"));
    }
}
