//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - Terminal resizes and periodic ticks.
//! - Protocol notifications translated from the underlying client.

use elevator_client::{
    ConfigError, ConnectionState, ElevatorSnapshot, PendingDecision, SimulationConfig,
};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection state changed.
    ConnectionChanged(ConnectionState),

    /// Configuration editing enabled or disabled.
    ConfigEditing {
        /// Whether the editor accepts input.
        enabled: bool,
    },

    /// Effective configuration replaced.
    ConfigChanged(SimulationConfig),

    /// Applied edits were invalid and have been substituted.
    ConfigCorrected {
        /// Substituted configuration.
        config: SimulationConfig,
        /// Problems found.
        errors: Vec<ConfigError>,
    },

    /// Building view must be rebuilt.
    RebuildRequired(SimulationConfig),

    /// New elevator snapshot.
    SnapshotUpdated(ElevatorSnapshot),

    /// Boarding decision prompt presented or refreshed.
    DecisionPrompted(PendingDecision),

    /// Boarding decision prompt dismissed.
    DecisionDismissed,

    /// Decision answer rejected; the prompt stays open.
    DecisionRejected {
        /// Why the answer was rejected.
        message: String,
    },

    /// A call from this floor was sent.
    CallSent {
        /// Calling floor.
        floor: i32,
    },

    /// Message for the user.
    Alert {
        /// Message text.
        message: String,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
