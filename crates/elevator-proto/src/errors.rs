//! Protocol error types.
//!
//! Decoding failures never tear down the connection: the caller logs the
//! error and drops the offending message.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding stream messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound text was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// Inbound JSON was valid but not an object.
    #[error("expected a JSON object, got {kind}")]
    NotAnObject {
        /// JSON kind that was received instead (array, string, ...).
        kind: &'static str,
    },

    /// A known control message was missing fields or had the wrong types.
    #[error("malformed {message_type} message: {reason}")]
    MalformedControl {
        /// The `type` tag of the message.
        message_type: &'static str,
        /// Deserializer diagnostic.
        reason: String,
    },

    /// A snapshot-shaped message could not be interpreted.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Outbound message could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),
}
