//! Outbound message payloads.

use serde::{Deserialize, Serialize};

use crate::floor::BoardDirection;

/// Simulation configuration proposal.
///
/// `start_floor` is always the same as `min_floor`; it is still sent because
/// the server expects the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configure {
    /// Lowest floor served.
    pub min_floor: i32,
    /// Highest floor served.
    pub max_floor: i32,
    /// Floor the car starts on.
    pub start_floor: i32,
    /// Maximum passengers in the car.
    pub capacity: u32,
    /// Seconds per simulation tick, in `[1.0, 3.0]`.
    pub cycle_time: f64,
}

/// Hail request from a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Floor the group waits on.
    pub floor: i32,
    /// Floor the group wants to reach.
    pub destination: i32,
    /// Group size, at least 1.
    pub num_passengers: u32,
}

/// Response to a boarding decision request.
///
/// `(floor, direction, destination)` must echo the request being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingDecision {
    /// Floor of the waiting group.
    pub floor: i32,
    /// Travel direction of the waiting group.
    pub direction: BoardDirection,
    /// Destination of the waiting group.
    pub destination: i32,
    /// How many passengers board; zero declines.
    pub num_to_board: u32,
}
