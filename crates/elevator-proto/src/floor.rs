//! Floor numbering and direction primitives shared by all messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Human-readable floor label. Floor 0 is the ground floor `G`.
pub fn display_floor(floor: i32) -> String {
    if floor == 0 { "G".to_string() } else { floor.to_string() }
}

/// Direction a waiting group intends to travel.
///
/// Serialized as `"up"` / `"down"`; part of the decision correlation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardDirection {
    /// Travelling to a higher floor.
    Up,
    /// Travelling to a lower floor.
    Down,
}

impl BoardDirection {
    /// Arrow glyph used in waiting summaries.
    pub fn arrow(self) -> char {
        match self {
            Self::Up => '▲',
            Self::Down => '▼',
        }
    }
}

impl fmt::Display for BoardDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Current travel direction of the car, encoded on the wire as `-1`, `0`, `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Motion {
    /// Moving down (`-1`).
    Down,
    /// Stationary (`0`).
    #[default]
    Idle,
    /// Moving up (`1`).
    Up,
}

impl Motion {
    /// Status-panel label, e.g. `▲ Up`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Down => "▼ Down",
            Self::Idle => "■ Idle",
            Self::Up => "▲ Up",
        }
    }
}

impl TryFrom<i8> for Motion {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Down),
            0 => Ok(Self::Idle),
            1 => Ok(Self::Up),
            other => Err(format!("direction must be -1, 0 or 1, got {other}")),
        }
    }
}

impl From<Motion> for i8 {
    fn from(motion: Motion) -> Self {
        match motion {
            Motion::Down => -1,
            Motion::Idle => 0,
            Motion::Up => 1,
        }
    }
}
