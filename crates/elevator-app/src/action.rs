//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use elevator_client::ConfigCandidate;
use elevator_proto::CorrelationKey;

use crate::Theme;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Connect to the simulation.
    Connect {
        /// WebSocket endpoint.
        endpoint: String,
    },

    /// Disconnect from the simulation.
    Disconnect,

    /// Apply configuration edits.
    ApplyConfig(ConfigCandidate),

    /// Hail the elevator.
    Call {
        /// Calling floor.
        floor: i32,
        /// Selected destination.
        destination: Option<i32>,
        /// Group size.
        num_passengers: i64,
    },

    /// Answer the live boarding decision.
    ConfirmDecision {
        /// Key of the decision being answered.
        key: CorrelationKey,
        /// Passengers to board.
        num_to_board: i64,
    },

    /// Decline the live boarding decision.
    CancelDecision,

    /// Save the display theme.
    PersistTheme(Theme),
}
