//! Inbound message payloads.
//!
//! Snapshots are parsed leniently: the server's encoder omits fields freely
//! and uses two encodings for the stop list, so every snapshot field has a
//! default, and a field of the wrong type reads as its default instead of
//! dropping the snapshot. Control payloads are strict.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::floor::{BoardDirection, Motion};

/// Identity of a boarding decision, used in place of a request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey {
    /// Floor of the waiting group.
    pub floor: i32,
    /// Travel direction of the waiting group.
    pub direction: BoardDirection,
    /// Destination of the waiting group.
    pub destination: i32,
}

/// Body of a `decision_needed` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Floor of the waiting group.
    pub floor: i32,
    /// Travel direction of the waiting group.
    pub direction: BoardDirection,
    /// Destination of the waiting group.
    pub destination: i32,
    /// Size of the waiting group.
    pub num_waiting: u32,
    /// Free space in the car; the answer must lie in `[0, can_board]`.
    pub can_board: u32,
}

impl DecisionRequest {
    /// Correlation key of this request.
    pub fn key(&self) -> CorrelationKey {
        CorrelationKey {
            floor: self.floor,
            direction: self.direction,
            destination: self.destination,
        }
    }
}

/// Requested stops, either a list of labels or the literal string `"None"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopsDisplay {
    /// Stop labels in service order.
    List(Vec<String>),
    /// Free text; `"None"` means no stops.
    Text(String),
}

impl Default for StopsDisplay {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl StopsDisplay {
    /// Normalise to a list of labels.
    pub fn into_labels(self) -> Vec<String> {
        match self {
            Self::List(labels) => labels,
            Self::Text(text) if text.is_empty() || text == "None" => Vec::new(),
            Self::Text(text) => vec![text],
        }
    }
}

/// Groups waiting on one floor, as `(destination, count)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitingGroups {
    /// Groups travelling up.
    pub up: Vec<(i32, u32)>,
    /// Groups travelling down.
    pub down: Vec<(i32, u32)>,
}

/// Raw state snapshot as pushed by the server on every tick.
///
/// The four configuration fields are optional; when present they are compared
/// against the local configuration to detect drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    /// Server-declared lowest floor.
    #[serde(deserialize_with = "lenient")]
    pub lowest_floor: Option<i32>,
    /// Server-declared highest floor.
    #[serde(deserialize_with = "lenient")]
    pub highest_floor: Option<i32>,
    /// Server-declared car capacity.
    #[serde(deserialize_with = "lenient")]
    pub capacity: Option<u32>,
    /// Server-declared tick length in seconds.
    #[serde(deserialize_with = "lenient")]
    pub cycle_time: Option<f64>,
    /// Floor the car is on.
    #[serde(deserialize_with = "lenient")]
    pub current_floor: i32,
    /// Travel direction of the car.
    #[serde(deserialize_with = "lenient")]
    pub direction: Motion,
    /// Passengers in the car.
    #[serde(deserialize_with = "lenient")]
    pub current_load: u32,
    /// Pre-formatted passenger destinations.
    #[serde(deserialize_with = "lenient")]
    pub passenger_destinations_display: Option<String>,
    /// Pre-formatted requested stops.
    #[serde(deserialize_with = "lenient")]
    pub stops_requested_display: StopsDisplay,
    /// Waiting groups keyed by floor number as a string. Floors whose groups
    /// are malformed are skipped.
    #[serde(deserialize_with = "lenient_waiting")]
    pub waiting_passengers: BTreeMap<String, WaitingGroups>,
}

/// Read a field, substituting its default when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_waiting<'de, D>(deserializer: D) -> Result<BTreeMap<String, WaitingGroups>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(floors) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    Ok(floors
        .into_iter()
        .filter_map(|(floor, groups)| {
            WaitingGroups::deserialize(groups).ok().map(|groups| (floor, groups))
        })
        .collect())
}
