//! Client events and actions.

use elevator_proto::{ClientMessage, CorrelationKey};

use crate::{
    config::{ConfigCandidate, SimulationConfig},
    connection::{AttemptId, ConnectionState},
    decision::PendingDecision,
    error::ConfigError,
    sync::ElevatorSnapshot,
};

/// Lifecycle and data reported by the streaming channel.
///
/// Every event names the attempt that produced it; events from an attempt
/// that is no longer current are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Channel finished opening.
    Opened {
        /// Producing attempt.
        attempt: AttemptId,
    },

    /// Text frame received.
    Message {
        /// Producing attempt.
        attempt: AttemptId,
        /// Raw JSON text.
        text: String,
    },

    /// Channel failed.
    Error {
        /// Producing attempt.
        attempt: AttemptId,
        /// Failure description.
        reason: String,
    },

    /// Channel closed.
    Closed {
        /// Producing attempt.
        attempt: AttemptId,
    },
}

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Forwarding channel lifecycle and inbound text as [`ChannelEvent`]s
/// - Forwarding user intents (connect, call, answer a decision, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// User wants to connect.
    Connect {
        /// Endpoint address.
        endpoint: String,
    },

    /// User wants to disconnect.
    Disconnect,

    /// Something happened on the channel.
    Channel(ChannelEvent),

    /// User applied configuration edits.
    ApplyConfig(ConfigCandidate),

    /// User hailed the elevator.
    Call {
        /// Floor the group waits on.
        floor: i32,
        /// Selected destination, `None` if nothing is selected.
        destination: Option<i32>,
        /// Group size as entered.
        num_passengers: i64,
    },

    /// User answered the live boarding decision.
    ConfirmDecision {
        /// Key of the decision being answered.
        key: CorrelationKey,
        /// Passengers to board.
        num_to_board: i64,
    },

    /// User dismissed the live boarding decision (boards nobody).
    CancelDecision,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientAction {
    /// Open a channel to the endpoint for this attempt.
    OpenChannel {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
        /// Endpoint address.
        endpoint: String,
    },

    /// Send a message on the channel.
    Send {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
        /// Outbound message.
        message: ClientMessage,
    },

    /// Close the channel gracefully.
    CloseChannel {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
    },

    /// Drop the channel without waiting for its lifecycle callbacks.
    AbandonChannel {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
    },

    /// Connection state changed.
    ConnectionChanged(ConnectionState),

    /// Configuration editing should be enabled or disabled.
    ConfigEditing {
        /// Whether the editor accepts input.
        enabled: bool,
    },

    /// The effective configuration was replaced.
    ConfigChanged(SimulationConfig),

    /// Applied edits were invalid; the editor should show the substituted
    /// values.
    ConfigCorrected {
        /// Configuration with defaults substituted.
        config: SimulationConfig,
        /// Problems found.
        errors: Vec<ConfigError>,
    },

    /// The building view must be rebuilt for this configuration.
    RebuildRequired(SimulationConfig),

    /// A new snapshot is available for rendering.
    SnapshotUpdated(ElevatorSnapshot),

    /// Present (or refresh) the boarding decision prompt.
    PromptDecision(PendingDecision),

    /// Hide the boarding decision prompt.
    DismissDecision,

    /// A call from this floor was sent; its draft can be reset.
    CallSent {
        /// Calling floor.
        floor: i32,
    },

    /// Show a message to the user.
    Alert {
        /// Message text.
        message: String,
    },
}
