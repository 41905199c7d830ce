//! Property-based tests for client invariants.
//!
//! Arbitrary sequences of user intents and server messages are fed through a
//! fake channel; after every step the single-flight and configuration
//! invariants must hold.

#![allow(clippy::unwrap_used)]

use elevator_client::{
    ChannelEvent, Client, ClientAction, ClientEvent, ConfigCandidate, ConfigStore,
    SimulationConfig,
};
use elevator_proto::ClientMessage;
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Step {
    Decision { floor: i32, up: bool, destination: i32, can_board: u32 },
    Snapshot { lowest: i32, highest: i32, capacity: u32 },
    Confirm { stale: bool, value: i64 },
    Cancel,
    Disconnect,
    RemoteClose,
    Reconnect,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0i32..6, any::<bool>(), 0i32..6, 0u32..5).prop_map(|(floor, up, destination, can_board)| {
            Step::Decision { floor, up, destination, can_board }
        }),
        2 => (-2i32..2, 3i32..9, 1u32..12)
            .prop_map(|(lowest, highest, capacity)| Step::Snapshot { lowest, highest, capacity }),
        3 => (any::<bool>(), -1i64..6).prop_map(|(stale, value)| Step::Confirm { stale, value }),
        2 => Just(Step::Cancel),
        1 => Just(Step::Disconnect),
        1 => Just(Step::RemoteClose),
        1 => Just(Step::Reconnect),
    ]
}

fn decisions_sent(actions: &[ClientAction]) -> usize {
    actions
        .iter()
        .filter(|a| {
            matches!(a, ClientAction::Send { message: ClientMessage::BoardingDecision(_), .. })
        })
        .count()
}

proptest! {
    #[test]
    fn single_flight_holds(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut client = Client::default();
        let mut attempt = {
            let actions = client.handle(ClientEvent::Connect { endpoint: "ws://test".into() }).unwrap();
            actions.iter().find_map(|a| match a {
                ClientAction::OpenChannel { attempt, .. } => Some(*attempt),
                _ => None,
            }).unwrap()
        };
        client.handle(ClientEvent::Channel(ChannelEvent::Opened { attempt })).unwrap();

        for step in steps {
            let pending_before = client.pending_decision().copied();
            let was_open = client.connection_state() == elevator_client::ConnectionState::Open;

            let actions = match step {
                Step::Decision { floor, up, destination, can_board } => {
                    let text = json!({
                        "type": "decision_needed",
                        "data": {
                            "floor": floor,
                            "direction": if up { "up" } else { "down" },
                            "destination": destination,
                            "num_waiting": can_board + 1,
                            "can_board": can_board,
                        },
                    }).to_string();
                    client.handle(ClientEvent::Channel(ChannelEvent::Message { attempt, text })).unwrap()
                },
                Step::Snapshot { lowest, highest, capacity } => {
                    let text = json!({
                        "lowest_floor": lowest,
                        "highest_floor": highest,
                        "capacity": capacity,
                    }).to_string();
                    client.handle(ClientEvent::Channel(ChannelEvent::Message { attempt, text })).unwrap()
                },
                Step::Confirm { stale, value } => {
                    let Some(pending) = pending_before else { continue };
                    let mut key = pending.key();
                    if stale {
                        key.floor += 100;
                    }
                    let result = client.handle(ClientEvent::ConfirmDecision { key, num_to_board: value });
                    if stale {
                        // Mismatched answers are dropped whatever their value
                        let cleared = result.is_ok();
                        prop_assert!(cleared);
                    }
                    let actions = result.unwrap_or_default();
                    if stale {
                        prop_assert_eq!(decisions_sent(&actions), 0);
                    }
                    actions
                },
                Step::Cancel => client.handle(ClientEvent::CancelDecision).unwrap_or_default(),
                Step::Disconnect => {
                    let actions = client.handle(ClientEvent::Disconnect).unwrap();
                    let expected = usize::from(was_open && pending_before.is_some());
                    prop_assert_eq!(decisions_sent(&actions), expected);
                    client.handle(ClientEvent::Channel(ChannelEvent::Closed { attempt })).unwrap();
                    actions
                },
                Step::RemoteClose => {
                    let actions =
                        client.handle(ClientEvent::Channel(ChannelEvent::Closed { attempt })).unwrap();
                    prop_assert_eq!(decisions_sent(&actions), 0);
                    actions
                },
                Step::Reconnect => {
                    let Ok(actions) = client.handle(ClientEvent::Connect { endpoint: "ws://test".into() }) else {
                        continue;
                    };
                    if let Some(next) = actions.iter().find_map(|a| match a {
                        ClientAction::OpenChannel { attempt, .. } => Some(*attempt),
                        _ => None,
                    }) {
                        attempt = next;
                    }
                    client.handle(ClientEvent::Channel(ChannelEvent::Opened { attempt })).unwrap()
                },
            };

            // At most one response per step, never more than one prompt shown
            prop_assert!(decisions_sent(&actions) <= 1);
            let prompts = actions.iter().filter(|a| matches!(a, ClientAction::PromptDecision(_))).count();
            prop_assert!(prompts <= 1);

            // Nothing is pending once the channel is gone
            if client.connection_state() != elevator_client::ConnectionState::Open {
                prop_assert!(client.pending_decision().is_none());
            }

            let config = client.config();
            prop_assert_eq!(config.start_floor(), config.min_floor());
        }
    }

    #[test]
    fn validate_never_yields_out_of_range(
        min in prop::option::of(-1000i64..1000),
        max in prop::option::of(-1000i64..1000),
        capacity in prop::option::of(-5i64..50),
        cycle_time in prop::option::of(-1.0f64..5.0),
    ) {
        let store = ConfigStore::default();
        let validated = store.validate(&ConfigCandidate { min_floor: min, max_floor: max, capacity, cycle_time });
        let config = validated.config;

        prop_assert!(config.min_floor() <= config.max_floor());
        prop_assert!(config.capacity() >= 1);
        prop_assert!((1.0..=3.0).contains(&config.cycle_time()));
        prop_assert_eq!(config.start_floor(), config.min_floor());

        let bad_capacity = capacity.is_none_or(|c| c < 1);
        let bad_speed = cycle_time.is_none_or(|c| !(1.0..=3.0).contains(&c));
        if bad_capacity || bad_speed {
            prop_assert!(!validated.is_valid());
        }
    }

    #[test]
    fn start_floor_follows_min_after_replace(
        min in -100i32..100,
        span in 0i32..100,
        capacity in 1u32..50,
    ) {
        let mut store = ConfigStore::default();
        store.replace(SimulationConfig::new(min, min + span, capacity, 2.0));
        prop_assert_eq!(store.read().start_floor(), min);
    }
}
