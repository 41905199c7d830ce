//! Error types for the elevator client.
//!
//! One error type per component, plus [`ClientError`] which the top-level
//! state machine returns. None of these are fatal: the worst outcome is a
//! reset to the disconnected state.

use elevator_proto::display_floor;
use thiserror::Error;

use crate::{config::ConfigField, connection::ConnectionState};

/// Invalid simulation configuration values.
///
/// Recovered locally by substituting defaults; see
/// [`ConfigStore::validate`](crate::ConfigStore::validate).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Field could not be parsed as a number.
    #[error("{field} is not a number")]
    Malformed {
        /// Offending field.
        field: ConfigField,
    },

    /// Integer field is outside its allowed range.
    #[error("{field} value {value} is out of range")]
    InvalidRange {
        /// Offending field.
        field: ConfigField,
        /// Rejected value.
        value: i64,
    },

    /// Cycle time is outside `[1.0, 3.0]` seconds.
    #[error("cycle time {value}s must be between 1.0 and 3.0 seconds")]
    InvalidSpeed {
        /// Rejected value.
        value: f64,
    },
}

/// Errors from the connection lifecycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// `connect` was called while a connection is already open.
    #[error("already connected")]
    AlreadyOpen,

    /// Operation requires an open connection.
    #[error("not connected (state: {state})")]
    NotConnected {
        /// State when the operation was attempted.
        state: ConnectionState,
    },

    /// The effective configuration failed validation when the channel opened.
    #[error("configuration invalid, disconnecting: {0}")]
    ConfigInvalidOnConnect(ConfigError),

    /// Connection changes are locked while a boarding decision is pending.
    #[error("answer the pending boarding decision first")]
    DecisionPending,

    /// Configuration can only be applied while disconnected.
    #[error("configuration changes require reconnecting to the simulation")]
    ReconnectRequired,

    /// The channel failed.
    #[error("connection error: {0}")]
    Channel(String),
}

/// Invalid call request. The request is never sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// No destination selected.
    #[error("select a destination floor")]
    DestinationMissing,

    /// Passenger count is not a positive integer.
    #[error("passenger count must be at least 1, got {value}")]
    InvalidPassengerCount {
        /// Rejected count.
        value: i64,
    },

    /// Destination is outside the configured floor range.
    #[error(
        "destination {} is outside floors {} to {}",
        label(.destination), label(.min), label(.max)
    )]
    DestinationOutOfRange {
        /// Requested destination.
        destination: i32,
        /// Lowest configured floor.
        min: i32,
        /// Highest configured floor.
        max: i32,
    },

    /// Destination equals the calling floor.
    #[error("destination must differ from the current floor {}", label(.floor))]
    SameFloorDestination {
        /// Calling floor.
        floor: i32,
    },
}

fn label(floor: &i32) -> String {
    display_floor(*floor)
}

/// Invalid boarding decision response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// No decision is awaiting a response.
    #[error("no boarding decision pending")]
    NoPendingDecision,

    /// Response is not an integer.
    #[error("enter a whole number between 0 and {max}")]
    NotAnInteger {
        /// Upper bound of the allowed range.
        max: u32,
    },

    /// Response is outside `[0, can_board]`.
    #[error("{value} is outside 0 to {max}")]
    OutOfRange {
        /// Rejected response.
        value: i64,
        /// Upper bound of the allowed range.
        max: u32,
    },
}

/// Errors returned by [`Client::handle`](crate::Client::handle).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connection error.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Call validation error.
    #[error(transparent)]
    Call(#[from] CallError),

    /// Decision response error.
    #[error(transparent)]
    Decision(#[from] DecisionError),
}
