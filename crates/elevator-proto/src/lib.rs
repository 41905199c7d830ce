//! Elevator Stream Protocol
//!
//! Wire types for the JSON message stream between the visualisation client
//! and the remote elevator simulation.
//!
//! # Message Flow
//!
//! ```text
//! Client                                   Server
//!   │ ── configure (once, after open) ──────> │
//!   │ <────────────── snapshot (every tick) ─ │
//!   │ ── call ──────────────────────────────> │
//!   │ <────────────────────── decision_needed │
//!   │ ── boarding_decision ─────────────────> │
//!   │ <──────────────────────── error / info  │
//! ```
//!
//! Outbound messages are [`ClientMessage`] variants. Inbound text is decoded
//! with [`ServerMessage::decode`], which routes any object whose `type` is not
//! a known control message to [`ServerMessage::Snapshot`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod floor;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use floor::{BoardDirection, Motion, display_floor};
pub use payloads::{
    ClientMessage, ServerMessage,
    client::{BoardingDecision, Call, Configure},
    server::{CorrelationKey, DecisionRequest, StateSnapshot, StopsDisplay, WaitingGroups},
};
