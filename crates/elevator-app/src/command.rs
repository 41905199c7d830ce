//! Channel I/O commands produced by the bridge.

use elevator_client::AttemptId;

/// Socket work for the driver to perform.
///
/// Outbound messages are already JSON-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCommand {
    /// Open a channel for this attempt.
    Open {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
        /// Endpoint address.
        endpoint: String,
    },

    /// Send a text frame.
    Send {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
        /// JSON text.
        text: String,
    },

    /// Close the channel gracefully.
    Close {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
    },

    /// Drop the channel without reporting its lifecycle.
    Abandon {
        /// Attempt the channel belongs to.
        attempt: AttemptId,
    },
}
