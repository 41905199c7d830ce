//! Property-based tests for inbound message decoding
//!
//! The server stream is untrusted input: decoding must never panic, and the
//! snapshot fallback must hold for any object that is not a control message.

#![allow(clippy::unwrap_used)]

use elevator_proto::{Motion, ProtocolError, ServerMessage, StopsDisplay};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for `type` tags that are not control messages
fn non_control_tag() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z_]{0,16}").prop_filter("control tag", |tag| {
        !matches!(tag.as_deref(), Some("decision_needed" | "error" | "info"))
    })
}

proptest! {
    #[test]
    fn decode_never_panics(text in ".{0,256}") {
        let _ = ServerMessage::decode(&text);
    }

    #[test]
    fn untagged_objects_are_snapshots(
        tag in non_control_tag(),
        floor in -50i32..50,
        load in 0u32..100,
    ) {
        let mut value = json!({ "current_floor": floor, "current_load": load });
        if let Some(tag) = tag {
            value["type"] = json!(tag);
        }

        let msg = ServerMessage::decode(&value.to_string()).unwrap();
        let ServerMessage::Snapshot(snapshot) = msg else {
            return Err(TestCaseError::fail("expected snapshot"));
        };
        prop_assert_eq!(snapshot.current_floor, floor);
        prop_assert_eq!(snapshot.current_load, load);
    }

    #[test]
    fn scalar_json_is_not_an_object(n in any::<i64>()) {
        prop_assert_eq!(
            ServerMessage::decode(&n.to_string()).unwrap_err(),
            ProtocolError::NotAnObject { kind: "number" }
        );
    }
}

#[test]
fn full_snapshot_decodes() {
    let text = json!({
        "lowest_floor": 0,
        "highest_floor": 9,
        "capacity": 6,
        "cycle_time": 1.5,
        "current_floor": 3,
        "direction": 1,
        "current_load": 4,
        "passenger_destinations_display": "5(2), 7(2)",
        "stops_requested_display": ["5", "7"],
        "waiting_passengers": {
            "2": { "up": [[6, 3]], "down": [] },
            "8": { "up": [], "down": [[0, 1], [4, 2]] },
        },
    })
    .to_string();

    let ServerMessage::Snapshot(snapshot) = ServerMessage::decode(&text).unwrap() else {
        unreachable!("expected snapshot");
    };
    assert_eq!(snapshot.highest_floor, Some(9));
    assert_eq!(snapshot.cycle_time, Some(1.5));
    assert_eq!(snapshot.waiting_passengers["8"].down, vec![(0, 1), (4, 2)]);
    assert_eq!(
        snapshot.stops_requested_display,
        StopsDisplay::List(vec!["5".into(), "7".into()])
    );
}

#[test]
fn stops_none_string_normalises_to_empty() {
    let text = r#"{"stops_requested_display":"None"}"#;
    let ServerMessage::Snapshot(snapshot) = ServerMessage::decode(text).unwrap() else {
        unreachable!("expected snapshot");
    };
    assert!(snapshot.stops_requested_display.into_labels().is_empty());
}

#[test]
fn mistyped_snapshot_field_keeps_snapshot() {
    let text = r#"{"direction":7,"capacity":2.5,"current_floor":4}"#;
    let ServerMessage::Snapshot(snapshot) = ServerMessage::decode(text).unwrap() else {
        unreachable!("expected snapshot");
    };
    assert_eq!(snapshot.direction, Motion::Idle);
    assert_eq!(snapshot.capacity, None);
    assert_eq!(snapshot.current_floor, 4);
}
