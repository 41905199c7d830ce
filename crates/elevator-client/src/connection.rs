//! Connection lifecycle state machine.
//!
//! Tracks the single "current" streaming channel. Each call to
//! [`ConnectionManager::connect`] starts a new attempt with a fresh
//! [`AttemptId`]; lifecycle callbacks carrying any other attempt are stale and
//! ignored. This is how a superseded attempt's late open/error/close is
//! suppressed without the channel itself having to cooperate.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ connect ┌────────────┐  opened   ┌──────┐ disconnect ┌─────────┐
//! │ Idle │────────>│ Connecting │──────────>│ Open │───────────>│ Closing │
//! └──────┘         └────────────┘           └──────┘            └─────────┘
//!                        │ error/closed         │ error/closed       │ closed
//!                        ↓                      ↓                    ↓
//!                  ┌─────────┐ / ┌────────┐ <───────────────────────────
//!                  │ Errored │   │ Closed │
//!                  └─────────┘   └────────┘
//! ```
//!
//! Errored and Closed are terminal for the attempt; `connect` leaves them.
//! There is no automatic reconnect.

use std::fmt;

use elevator_proto::ClientMessage;

use crate::error::ConnectionError;

/// Generation counter identifying one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl AttemptId {
    /// Wrap a raw attempt number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw attempt number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection has been attempted
    #[default]
    Idle,
    /// Channel requested, waiting for open
    Connecting,
    /// Channel open, messages flow
    Open,
    /// Local close requested, waiting for the channel to close
    Closing,
    /// Channel closed
    Closed,
    /// Channel failed
    Errored,
}

impl ConnectionState {
    /// True while an attempt is in flight or open.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open | Self::Closing)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Errored => "errored",
        })
    }
}

/// Actions returned by the connection state machine.
///
/// The driver executes these against the real channel:
/// - `Open`: Start connecting to the endpoint under this attempt
/// - `Send`: Encode and write the message
/// - `Close`: Begin a graceful close
/// - `Abandon`: Drop the channel without reporting its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionAction {
    /// Open a channel for this attempt
    Open {
        /// Attempt the channel belongs to
        attempt: AttemptId,
        /// Endpoint address
        endpoint: String,
    },

    /// Send a message on the open channel
    Send {
        /// Attempt the channel belongs to
        attempt: AttemptId,
        /// Outbound message
        message: ClientMessage,
    },

    /// Close the channel gracefully
    Close {
        /// Attempt the channel belongs to
        attempt: AttemptId,
    },

    /// Tear the channel down silently
    Abandon {
        /// Attempt the channel belongs to
        attempt: AttemptId,
    },
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownKind {
    /// Channel closed (locally or by the peer)
    Closed,
    /// Channel failed
    Errored {
        /// Failure description from the channel
        reason: String,
    },
}

/// Result of the single teardown path shared by error and close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teardown {
    /// Attempt that ended
    pub attempt: AttemptId,
    /// Whether the channel was Open when the teardown was observed
    pub was_open: bool,
    /// How it ended
    pub kind: TeardownKind,
}

/// Connection lifecycle state machine.
///
/// Pure state machine - no I/O. The driver reports channel lifecycle through
/// [`Self::handle_open`], [`Self::handle_error`] and [`Self::handle_close`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    /// Current state
    state: ConnectionState,
    /// Attempt considered current, if any
    current: Option<AttemptId>,
    /// Last attempt number handed out
    last_attempt: u64,
    /// Endpoint of the current attempt
    endpoint: Option<String>,
}

impl ConnectionManager {
    /// Create a manager in [`ConnectionState::Idle`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True if the channel is Open
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Current attempt. `None` before the first connect.
    pub fn attempt(&self) -> Option<AttemptId> {
        self.current
    }

    /// Endpoint of the current attempt.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Start a new connection attempt.
    ///
    /// A prior attempt still Connecting or Closing is abandoned first; its
    /// lifecycle callbacks become stale.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::AlreadyOpen` if the channel is Open
    pub fn connect(
        &mut self,
        endpoint: impl Into<String>,
    ) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state == ConnectionState::Open {
            return Err(ConnectionError::AlreadyOpen);
        }

        let mut actions = Vec::with_capacity(2);
        if let Some(previous) = self.current
            && self.state.is_active()
        {
            tracing::debug!(%previous, state = %self.state, "abandoning superseded attempt");
            actions.push(ConnectionAction::Abandon { attempt: previous });
        }

        self.last_attempt += 1;
        let attempt = AttemptId(self.last_attempt);
        let endpoint = endpoint.into();

        tracing::info!(%attempt, %endpoint, "connecting");
        self.current = Some(attempt);
        self.endpoint = Some(endpoint.clone());
        self.state = ConnectionState::Connecting;

        actions.push(ConnectionAction::Open { attempt, endpoint });
        Ok(actions)
    }

    /// Channel reported open. Returns `true` if this moved the current
    /// attempt to Open.
    pub fn handle_open(&mut self, attempt: AttemptId) -> bool {
        if !self.is_current(attempt) {
            tracing::debug!(%attempt, "ignoring open from stale attempt");
            return false;
        }
        if self.state != ConnectionState::Connecting {
            tracing::debug!(%attempt, state = %self.state, "ignoring open in unexpected state");
            return false;
        }

        tracing::info!(%attempt, "connection open");
        self.state = ConnectionState::Open;
        true
    }

    /// Channel reported an error. Returns the teardown if this ended the
    /// current attempt.
    pub fn handle_error(&mut self, attempt: AttemptId, reason: String) -> Option<Teardown> {
        self.teardown(attempt, TeardownKind::Errored { reason })
    }

    /// Channel reported close. Returns the teardown if this ended the current
    /// attempt.
    pub fn handle_close(&mut self, attempt: AttemptId) -> Option<Teardown> {
        self.teardown(attempt, TeardownKind::Closed)
    }

    /// Send a message on the open channel.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::NotConnected` unless the channel is Open
    pub fn send(&self, message: ClientMessage) -> Result<ConnectionAction, ConnectionError> {
        match (self.state, self.current) {
            (ConnectionState::Open, Some(attempt)) => {
                tracing::debug!(%attempt, kind = message.kind(), "sending");
                Ok(ConnectionAction::Send { attempt, message })
            },
            (state, _) => Err(ConnectionError::NotConnected { state }),
        }
    }

    /// Begin a graceful close. No-op unless the channel is Open.
    pub fn disconnect(&mut self) -> Vec<ConnectionAction> {
        match (self.state, self.current) {
            (ConnectionState::Open, Some(attempt)) => {
                tracing::info!(%attempt, "disconnecting");
                self.state = ConnectionState::Closing;
                vec![ConnectionAction::Close { attempt }]
            },
            _ => Vec::new(),
        }
    }

    fn is_current(&self, attempt: AttemptId) -> bool {
        self.current == Some(attempt)
    }

    fn teardown(&mut self, attempt: AttemptId, kind: TeardownKind) -> Option<Teardown> {
        if !self.is_current(attempt) {
            tracing::debug!(%attempt, ?kind, "ignoring teardown from stale attempt");
            return None;
        }
        if !self.state.is_active() {
            tracing::debug!(%attempt, ?kind, state = %self.state, "attempt already torn down");
            return None;
        }

        let was_open = self.state == ConnectionState::Open;
        self.state = match &kind {
            TeardownKind::Closed => ConnectionState::Closed,
            TeardownKind::Errored { reason } => {
                tracing::warn!(%attempt, %reason, "connection error");
                ConnectionState::Errored
            },
        };
        tracing::info!(%attempt, state = %self.state, was_open, "connection torn down");

        Some(Teardown { attempt, was_open, kind })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elevator_proto::Call;

    use super::*;

    const URL: &str = "ws://localhost:5050/ws";

    fn call() -> ClientMessage {
        ClientMessage::Call(Call { floor: 1, destination: 3, num_passengers: 1 })
    }

    fn open_manager() -> (ConnectionManager, AttemptId) {
        let mut manager = ConnectionManager::new();
        manager.connect(URL).unwrap();
        let attempt = manager.attempt().unwrap();
        assert!(manager.handle_open(attempt));
        (manager, attempt)
    }

    #[test]
    fn connect_opens_new_attempt() {
        let mut manager = ConnectionManager::new();
        let actions = manager.connect(URL).unwrap();

        assert_eq!(manager.state(), ConnectionState::Connecting);
        assert_eq!(
            actions,
            vec![ConnectionAction::Open { attempt: AttemptId::new(1), endpoint: URL.into() }]
        );
    }

    #[test]
    fn connect_while_open_fails() {
        let (mut manager, _) = open_manager();
        assert_eq!(manager.connect(URL), Err(ConnectionError::AlreadyOpen));
        assert_eq!(manager.state(), ConnectionState::Open);
    }

    #[test]
    fn reconnect_abandons_connecting_attempt() {
        let mut manager = ConnectionManager::new();
        manager.connect(URL).unwrap();
        let first = manager.attempt().unwrap();

        let actions = manager.connect(URL).unwrap();
        let second = manager.attempt().unwrap();

        assert_ne!(first, second);
        assert_eq!(actions[0], ConnectionAction::Abandon { attempt: first });

        // Late callbacks from the first attempt change nothing
        assert!(!manager.handle_open(first));
        assert!(manager.handle_error(first, "refused".into()).is_none());
        assert!(manager.handle_close(first).is_none());
        assert_eq!(manager.state(), ConnectionState::Connecting);
    }

    #[test]
    fn send_requires_open() {
        let mut manager = ConnectionManager::new();
        assert_eq!(
            manager.send(call()),
            Err(ConnectionError::NotConnected { state: ConnectionState::Idle })
        );

        manager.connect(URL).unwrap();
        assert!(manager.send(call()).is_err());
    }

    #[test]
    fn disconnect_is_noop_unless_open() {
        let mut manager = ConnectionManager::new();
        assert!(manager.disconnect().is_empty());

        manager.connect(URL).unwrap();
        assert!(manager.disconnect().is_empty());
        assert_eq!(manager.state(), ConnectionState::Connecting);
    }

    #[test]
    fn disconnect_then_close() {
        let (mut manager, attempt) = open_manager();

        assert_eq!(manager.disconnect(), vec![ConnectionAction::Close { attempt }]);
        assert_eq!(manager.state(), ConnectionState::Closing);

        let teardown = manager.handle_close(attempt).unwrap();
        assert!(!teardown.was_open);
        assert_eq!(manager.state(), ConnectionState::Closed);
    }

    #[test]
    fn error_then_close_tears_down_once() {
        let (mut manager, attempt) = open_manager();

        let teardown = manager.handle_error(attempt, "reset".into()).unwrap();
        assert!(teardown.was_open);
        assert_eq!(manager.state(), ConnectionState::Errored);

        assert!(manager.handle_close(attempt).is_none());
        assert_eq!(manager.state(), ConnectionState::Errored);
    }

    #[test]
    fn reconnect_after_close() {
        let (mut manager, attempt) = open_manager();
        manager.handle_close(attempt).unwrap();

        let actions = manager.connect(URL).unwrap();
        assert!(matches!(actions.as_slice(), [ConnectionAction::Open { .. }]));
    }
}
