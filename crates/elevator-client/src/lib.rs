//! Client
//!
//! Action-based client state machine for the elevator simulation stream.
//! Negotiates configuration with the server, mirrors pushed state snapshots,
//! and runs the correlated boarding-decision exchange.
//!
//! # Architecture
//!
//! The client is Sans-IO. It receives events ([`ClientEvent`]), processes them
//! through pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute. Channel lifecycle arrives as [`ChannelEvent`]s tagged
//! with the [`AttemptId`] that produced them, so a test can play the part of
//! the network without opening a socket.
//!
//! # Components
//!
//! - [`Client`]: Top-level state machine combining the components below
//! - [`ConfigStore`]: Effective simulation configuration
//! - [`ConnectionManager`]: Single-connection lifecycle
//! - [`StateSyncEngine`]: Snapshot normalisation and drift detection
//! - [`DecisionProtocol`]: Single-flight boarding decisions with a FIFO queue
//! - [`CallRequestBuilder`]: Call validation against the floor range
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::WebSocketTransport`]: WebSocket channel per connection
//!   attempt

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod call;
mod client;
mod config;
mod connection;
mod decision;
mod error;
mod event;
mod sync;

#[cfg(feature = "transport")]
pub mod transport;

pub use call::{CallRequest, CallRequestBuilder};
pub use client::Client;
pub use config::{
    ConfigCandidate, ConfigChange, ConfigField, ConfigStore, DEFAULT_CAPACITY, DEFAULT_CYCLE_TIME,
    DEFAULT_MAX_FLOOR, DEFAULT_MIN_FLOOR, MAX_CYCLE_TIME, MIN_CYCLE_TIME, SimulationConfig,
    Validated,
};
pub use connection::{
    AttemptId, ConnectionAction, ConnectionManager, ConnectionState, Teardown, TeardownKind,
};
pub use decision::{DecisionProtocol, PendingDecision, RequestOutcome, Resolution};
pub use error::{CallError, ClientError, ConfigError, ConnectionError, DecisionError};
pub use event::{ChannelEvent, ClientAction, ClientEvent};
pub use sync::{ElevatorSnapshot, StateSyncEngine, SyncOutcome, WaitingGroup, WaitingQueues};
