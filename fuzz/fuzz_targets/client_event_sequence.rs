//! Fuzz target for the client state machine
//!
//! Drives a Client through arbitrary interleavings of user intents and
//! channel callbacks, including callbacks from stale attempts.
//!
//! # Invariants
//!
//! - Client::handle never panics
//! - Every Send names the current attempt
//! - Every outbound message encodes
//! - A boarding decision is only pending while the channel is open

#![no_main]

use arbitrary::Arbitrary;
use elevator_client::{
    AttemptId, ChannelEvent, Client, ClientAction, ClientEvent, ConfigCandidate, ConnectionState,
    SimulationConfig,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Connect,
    Disconnect,
    Opened { stale: bool },
    Closed { stale: bool },
    Failed { stale: bool },
    Snapshot { floor: i8, lowest: Option<i8>, highest: Option<i8>, capacity: Option<u8> },
    DecisionNeeded { floor: i8, up: bool, destination: i8, num_waiting: u8, can_board: u8 },
    RawMessage(String),
    ApplyConfig { min: Option<i16>, max: Option<i16>, capacity: Option<i16>, cycle: Option<u8> },
    Call { floor: i8, destination: Option<i8>, num_passengers: i8 },
    Confirm { num_to_board: i16 },
    Cancel,
}

fn attempt_for(client: &Client, stale: bool) -> AttemptId {
    let current = client.connection_attempt().map_or(0, AttemptId::get);
    if stale { AttemptId::new(current.wrapping_add(1000)) } else { AttemptId::new(current) }
}

fn message(client: &Client, text: String) -> ClientEvent {
    ClientEvent::Channel(ChannelEvent::Message { attempt: attempt_for(client, false), text })
}

fn to_event(client: &Client, op: Op) -> Option<ClientEvent> {
    let event = match op {
        Op::Connect => ClientEvent::Connect { endpoint: "ws://fuzz/ws".into() },
        Op::Disconnect => ClientEvent::Disconnect,
        Op::Opened { stale } => {
            ClientEvent::Channel(ChannelEvent::Opened { attempt: attempt_for(client, stale) })
        },
        Op::Closed { stale } => {
            ClientEvent::Channel(ChannelEvent::Closed { attempt: attempt_for(client, stale) })
        },
        Op::Failed { stale } => ClientEvent::Channel(ChannelEvent::Error {
            attempt: attempt_for(client, stale),
            reason: "fuzz".into(),
        }),
        Op::Snapshot { floor, lowest, highest, capacity } => {
            let mut fields = vec![format!(r#""current_floor":{floor}"#)];
            if let Some(lowest) = lowest {
                fields.push(format!(r#""lowest_floor":{lowest}"#));
            }
            if let Some(highest) = highest {
                fields.push(format!(r#""highest_floor":{highest}"#));
            }
            if let Some(capacity) = capacity {
                fields.push(format!(r#""capacity":{capacity}"#));
            }
            message(client, format!("{{{}}}", fields.join(",")))
        },
        Op::DecisionNeeded { floor, up, destination, num_waiting, can_board } => {
            let direction = if up { "up" } else { "down" };
            message(
                client,
                format!(
                    r#"{{"type":"decision_needed","data":{{"floor":{floor},"direction":"{direction}","destination":{destination},"num_waiting":{num_waiting},"can_board":{can_board}}}}}"#
                ),
            )
        },
        Op::RawMessage(text) => message(client, text),
        Op::ApplyConfig { min, max, capacity, cycle } => ClientEvent::ApplyConfig(ConfigCandidate {
            min_floor: min.map(i64::from),
            max_floor: max.map(i64::from),
            capacity: capacity.map(i64::from),
            cycle_time: cycle.map(|c| f64::from(c) / 50.0),
        }),
        Op::Call { floor, destination, num_passengers } => ClientEvent::Call {
            floor: i32::from(floor),
            destination: destination.map(i32::from),
            num_passengers: i64::from(num_passengers),
        },
        Op::Confirm { num_to_board } => ClientEvent::ConfirmDecision {
            key: client.pending_decision()?.key(),
            num_to_board: i64::from(num_to_board),
        },
        Op::Cancel => ClientEvent::CancelDecision,
    };
    Some(event)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut client = Client::new(SimulationConfig::default());

    for op in ops {
        let Some(event) = to_event(&client, op) else {
            continue;
        };

        let Ok(actions) = client.handle(event) else {
            continue;
        };

        for action in actions {
            if let ClientAction::Send { attempt, message } = action {
                assert_eq!(Some(attempt), client.connection_attempt(), "send on stale attempt");
                assert!(message.encode().is_ok(), "unencodable message: {message:?}");
            }
        }

        if client.pending_decision().is_some() {
            assert_eq!(client.connection_state(), ConnectionState::Open);
        }
    }
});
