//! Snapshot mirroring and configuration drift detection.
//!
//! The server is the source of truth for configuration once connected. Every
//! snapshot is checked against the [`ConfigStore`]; if any of the four
//! declared fields differ, the store is replaced with the server's values
//! merged onto the local configuration. The snapshot is published either way.

use std::collections::BTreeMap;

use elevator_proto::{BoardDirection, Motion, StateSnapshot, WaitingGroups, display_floor};

use crate::config::{ConfigChange, ConfigStore};

/// Placeholder when the server sends no destinations text.
const EMPTY_DESTINATIONS: &str = "Empty";

/// One waiting group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingGroup {
    /// Floor the group wants to reach.
    pub destination: i32,
    /// Number of passengers.
    pub count: u32,
}

/// Waiting groups on one floor, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitingQueues {
    /// Groups travelling up.
    pub up: Vec<WaitingGroup>,
    /// Groups travelling down.
    pub down: Vec<WaitingGroup>,
}

impl WaitingQueues {
    /// Groups travelling in `direction`.
    pub fn groups(&self, direction: BoardDirection) -> &[WaitingGroup] {
        match direction {
            BoardDirection::Up => &self.up,
            BoardDirection::Down => &self.down,
        }
    }

    /// Total passengers waiting in both directions.
    pub fn total(&self) -> u32 {
        self.up.iter().chain(&self.down).map(|g| g.count).sum()
    }

    /// True if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    /// Labels like `3▲5` (three passengers going up to floor 5).
    pub fn summary(&self, direction: BoardDirection) -> Vec<String> {
        self.groups(direction)
            .iter()
            .map(|g| format!("{}{}{}", g.count, direction.arrow(), display_floor(g.destination)))
            .collect()
    }
}

impl From<WaitingGroups> for WaitingQueues {
    fn from(groups: WaitingGroups) -> Self {
        let convert = |pairs: Vec<(i32, u32)>| {
            pairs
                .into_iter()
                .map(|(destination, count)| WaitingGroup { destination, count })
                .collect()
        };
        Self { up: convert(groups.up), down: convert(groups.down) }
    }
}

/// Normalised elevator state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElevatorSnapshot {
    /// Floor the car is on.
    pub current_floor: i32,
    /// Travel direction.
    pub direction: Motion,
    /// Passengers in the car.
    pub current_load: u32,
    /// Car capacity.
    pub capacity: u32,
    /// Pre-formatted passenger destinations.
    pub destinations_display: String,
    /// Requested stops, in service order.
    pub stops_display: Vec<String>,
    /// Waiting groups by floor.
    pub waiting_by_floor: BTreeMap<i32, WaitingQueues>,
}

impl ElevatorSnapshot {
    /// Waiting groups on `floor`, if any.
    pub fn waiting_at(&self, floor: i32) -> Option<&WaitingQueues> {
        self.waiting_by_floor.get(&floor)
    }
}

/// Result of applying one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Set when drift replaced the configuration.
    pub drift: Option<ConfigChange>,
    /// Snapshot to publish.
    pub snapshot: ElevatorSnapshot,
}

/// Mirror of the latest server snapshot.
#[derive(Debug, Clone, Default)]
pub struct StateSyncEngine {
    latest: Option<ElevatorSnapshot>,
}

impl StateSyncEngine {
    /// Create an engine with no snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> Option<&ElevatorSnapshot> {
        self.latest.as_ref()
    }

    /// Forget the mirrored state.
    pub fn reset(&mut self) {
        self.latest = None;
    }

    /// Reconcile `raw` against `store` and publish it.
    pub fn apply(&mut self, store: &mut ConfigStore, raw: StateSnapshot) -> SyncOutcome {
        let local = store.read();
        let drifted =
            local.differs_from(raw.lowest_floor, raw.highest_floor, raw.capacity, raw.cycle_time);

        let drift = drifted.then(|| {
            let merged = local.with_server_values(
                raw.lowest_floor,
                raw.highest_floor,
                raw.capacity,
                raw.cycle_time,
            );
            tracing::info!(?local, server = ?merged, "configuration drift, adopting server values");
            store.replace(merged)
        });

        let snapshot = normalise(raw, store.read().capacity());
        self.latest = Some(snapshot.clone());
        SyncOutcome { drift, snapshot }
    }
}

fn normalise(raw: StateSnapshot, fallback_capacity: u32) -> ElevatorSnapshot {
    let waiting_by_floor = raw
        .waiting_passengers
        .into_iter()
        .filter_map(|(key, groups)| match key.trim().parse::<i32>() {
            Ok(floor) => Some((floor, WaitingQueues::from(groups))),
            Err(_) => {
                tracing::debug!(%key, "skipping waiting passengers for unparseable floor");
                None
            },
        })
        .collect();

    ElevatorSnapshot {
        current_floor: raw.current_floor,
        direction: raw.direction,
        current_load: raw.current_load,
        capacity: raw.capacity.unwrap_or(fallback_capacity),
        destinations_display: raw
            .passenger_destinations_display
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| EMPTY_DESTINATIONS.to_string()),
        stops_display: raw.stops_requested_display.into_labels(),
        waiting_by_floor,
    }
}
