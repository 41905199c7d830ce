//! Fuzz target for ServerMessage::decode
//!
//! # Strategy
//!
//! - Raw text: arbitrary UTF-8 straight into the decoder
//! - Tagged objects: a known `type` with an arbitrary body, so the control
//!   payload parsers see well-formed JSON with wrong shapes
//!
//! # Invariants
//!
//! - NEVER panic on malformed input
//! - Non-object JSON is always rejected
//! - A decoded snapshot converts into display labels without panicking

#![no_main]

use arbitrary::Arbitrary;
use elevator_proto::{ServerMessage, StopsDisplay};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(String),
    Tagged { tag: Tag, body: String },
}

#[derive(Debug, Arbitrary)]
enum Tag {
    DecisionNeeded,
    Error,
    Info,
    State,
}

impl Tag {
    fn as_str(&self) -> &'static str {
        match self {
            Self::DecisionNeeded => "decision_needed",
            Self::Error => "error",
            Self::Info => "info",
            Self::State => "state",
        }
    }
}

fuzz_target!(|input: Input| {
    let text = match input {
        Input::Raw(text) => text,
        Input::Tagged { tag, body } => {
            let body = if body.trim().is_empty() { "null".to_string() } else { body };
            format!(r#"{{"type":"{}","data":{body},"message":{body}}}"#, tag.as_str())
        },
    };

    let Ok(message) = ServerMessage::decode(&text) else {
        return;
    };

    assert!(text.trim_start().starts_with('{'), "non-object decoded: {text}");

    if let ServerMessage::Snapshot(snapshot) = message {
        let stops: StopsDisplay = snapshot.stops_requested_display;
        let _ = stops.into_labels();
    }
});
