//! JSON-encoded stream messages.
//!
//! Every message is a single JSON object carrying a `type` tag. Outbound
//! messages are a closed set and use serde's internally tagged enum encoding.
//! Inbound messages are open-ended: the server pushes state snapshots without a
//! recognised tag, so decoding inspects `type` by hand and falls back to
//! [`StateSnapshot`] for anything it does not know.
//!
//! # Invariants
//!
//! - `decision_needed`, `error` and `info` are the only control tags. Any other
//!   object, including one without a `type`, is a snapshot.
//! - A malformed control message is an error, never a snapshot.

pub mod client;
pub mod server;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// Messages sent from the client to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Proposed simulation configuration, sent once right after open.
    Configure(client::Configure),
    /// Hail the elevator from a floor.
    Call(client::Call),
    /// Answer to a `decision_needed` request.
    BoardingDecision(client::BoardingDecision),
}

impl ClientMessage {
    /// Wire tag of this message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Call(_) => "call",
            Self::BoardingDecision(_) => "boarding_decision",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Messages received from the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// A waiting group does not fit and the user must choose how many board.
    DecisionNeeded(server::DecisionRequest),
    /// Server-side rejection; surfaced to the user, connection stays open.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// Informational notice; logged only.
    Info {
        /// Human-readable notice.
        message: String,
    },
    /// Periodic simulation state.
    Snapshot(Box<server::StateSnapshot>),
}

#[derive(Deserialize)]
struct DecisionEnvelope {
    data: server::DecisionRequest,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: String,
}

impl ServerMessage {
    /// Wire tag of this message, for logging. Snapshots report `state`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DecisionNeeded(_) => "decision_needed",
            Self::Error { .. } => "error",
            Self::Info { .. } => "info",
            Self::Snapshot(_) => "state",
        }
    }

    /// Decode one inbound text frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Json` if the text is not JSON
    /// - `ProtocolError::NotAnObject` if the JSON is not an object
    /// - `ProtocolError::MalformedControl` if a control message has bad fields
    /// - `ProtocolError::MalformedSnapshot` if the snapshot object cannot be
    ///   read; mistyped fields fall back to defaults instead
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::Json(e.to_string()))?;

        let tag = match &value {
            Value::Object(fields) => fields.get("type").and_then(Value::as_str),
            other => return Err(ProtocolError::NotAnObject { kind: json_kind(other) }),
        };

        match tag {
            Some("decision_needed") => {
                let envelope: DecisionEnvelope =
                    serde_json::from_value(value).map_err(|e| malformed("decision_needed", &e))?;
                Ok(Self::DecisionNeeded(envelope.data))
            },
            Some("error") => {
                let envelope: MessageEnvelope =
                    serde_json::from_value(value).map_err(|e| malformed("error", &e))?;
                Ok(Self::Error { message: envelope.message })
            },
            Some("info") => {
                let envelope: MessageEnvelope =
                    serde_json::from_value(value).map_err(|e| malformed("info", &e))?;
                Ok(Self::Info { message: envelope.message })
            },
            _ => {
                let snapshot: server::StateSnapshot = serde_json::from_value(value)
                    .map_err(|e| ProtocolError::MalformedSnapshot(e.to_string()))?;
                Ok(Self::Snapshot(Box::new(snapshot)))
            },
        }
    }
}

fn malformed(message_type: &'static str, err: &serde_json::Error) -> ProtocolError {
    ProtocolError::MalformedControl { message_type, reason: err.to_string() }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
