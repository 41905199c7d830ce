//! Simulation configuration store.
//!
//! Holds the effective configuration and exposes read/validate/replace. The
//! configuration is always replaced wholesale; there is no field setter.
//!
//! # Invariants
//!
//! - `start_floor == min_floor` for every [`SimulationConfig`] value. The start
//!   floor is derived in the constructor and has no setter.
//! - [`ConfigStore::validate`] never fails outright: invalid fields are
//!   substituted with their defaults and reported alongside the result.

use std::{fmt, ops::RangeInclusive};

use elevator_proto::Configure;

use crate::error::ConfigError;

/// Default lowest floor.
pub const DEFAULT_MIN_FLOOR: i32 = 0;

/// Default highest floor.
pub const DEFAULT_MAX_FLOOR: i32 = 5;

/// Default car capacity.
pub const DEFAULT_CAPACITY: u32 = 8;

/// Default seconds per simulation tick.
pub const DEFAULT_CYCLE_TIME: f64 = 2.0;

/// Shortest allowed tick.
pub const MIN_CYCLE_TIME: f64 = 1.0;

/// Longest allowed tick.
pub const MAX_CYCLE_TIME: f64 = 3.0;

/// Tolerance when comparing cycle times received over the wire.
const CYCLE_TIME_EPSILON: f64 = 1e-9;

/// Configurable fields, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    /// Lowest floor.
    MinFloor,
    /// Highest floor.
    MaxFloor,
    /// Car capacity.
    Capacity,
    /// Seconds per tick.
    CycleTime,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MinFloor => "min floor",
            Self::MaxFloor => "max floor",
            Self::Capacity => "capacity",
            Self::CycleTime => "cycle time",
        })
    }
}

/// Effective simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    min_floor: i32,
    max_floor: i32,
    start_floor: i32,
    capacity: u32,
    cycle_time: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FLOOR, DEFAULT_MAX_FLOOR, DEFAULT_CAPACITY, DEFAULT_CYCLE_TIME)
    }
}

impl SimulationConfig {
    /// Build a configuration without validation. The start floor is set to
    /// `min_floor`.
    ///
    /// Use [`ConfigStore::validate`] for untrusted values.
    pub fn new(min_floor: i32, max_floor: i32, capacity: u32, cycle_time: f64) -> Self {
        Self { min_floor, max_floor, start_floor: min_floor, capacity, cycle_time }
    }

    /// Lowest floor.
    pub fn min_floor(&self) -> i32 {
        self.min_floor
    }

    /// Highest floor.
    pub fn max_floor(&self) -> i32 {
        self.max_floor
    }

    /// Floor the car starts on. Always equal to [`Self::min_floor`].
    pub fn start_floor(&self) -> i32 {
        self.start_floor
    }

    /// Car capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Seconds per tick.
    pub fn cycle_time(&self) -> f64 {
        self.cycle_time
    }

    /// All served floors, lowest first.
    pub fn floors(&self) -> RangeInclusive<i32> {
        self.min_floor..=self.max_floor
    }

    /// Whether `floor` is served.
    pub fn contains_floor(&self, floor: i32) -> bool {
        self.floors().contains(&floor)
    }

    /// Merge server-declared values onto this configuration. Present values
    /// win; the start floor is derived again.
    pub fn with_server_values(
        &self,
        min_floor: Option<i32>,
        max_floor: Option<i32>,
        capacity: Option<u32>,
        cycle_time: Option<f64>,
    ) -> Self {
        Self::new(
            min_floor.unwrap_or(self.min_floor),
            max_floor.unwrap_or(self.max_floor),
            capacity.unwrap_or(self.capacity),
            cycle_time.unwrap_or(self.cycle_time),
        )
    }

    /// Whether any present server value differs from this configuration.
    pub fn differs_from(
        &self,
        min_floor: Option<i32>,
        max_floor: Option<i32>,
        capacity: Option<u32>,
        cycle_time: Option<f64>,
    ) -> bool {
        min_floor.is_some_and(|v| v != self.min_floor)
            || max_floor.is_some_and(|v| v != self.max_floor)
            || capacity.is_some_and(|v| v != self.capacity)
            || cycle_time.is_some_and(|v| (v - self.cycle_time).abs() > CYCLE_TIME_EPSILON)
    }

    /// The `configure` message announcing this configuration.
    pub fn to_configure(&self) -> Configure {
        Configure {
            min_floor: self.min_floor,
            max_floor: self.max_floor,
            start_floor: self.start_floor,
            capacity: self.capacity,
            cycle_time: self.cycle_time,
        }
    }
}

/// Unvalidated configuration input, e.g. from an editor.
///
/// `None` marks a field that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigCandidate {
    /// Lowest floor.
    pub min_floor: Option<i64>,
    /// Highest floor.
    pub max_floor: Option<i64>,
    /// Car capacity.
    pub capacity: Option<i64>,
    /// Seconds per tick.
    pub cycle_time: Option<f64>,
}

impl ConfigCandidate {
    /// Parse editor text. Unparseable or non-finite fields become `None`.
    pub fn parse(min_floor: &str, max_floor: &str, capacity: &str, cycle_time: &str) -> Self {
        Self {
            min_floor: min_floor.trim().parse().ok(),
            max_floor: max_floor.trim().parse().ok(),
            capacity: capacity.trim().parse().ok(),
            cycle_time: cycle_time.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl From<&SimulationConfig> for ConfigCandidate {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            min_floor: Some(i64::from(config.min_floor)),
            max_floor: Some(i64::from(config.max_floor)),
            capacity: Some(i64::from(config.capacity)),
            cycle_time: Some(config.cycle_time),
        }
    }
}

/// Result of validating a [`ConfigCandidate`].
///
/// `config` is always usable: invalid fields hold their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Configuration with invalid fields substituted.
    pub config: SimulationConfig,
    /// Every problem found, in field order.
    pub errors: Vec<ConfigError>,
}

impl Validated {
    /// True if no field needed substitution.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Strict view: the configuration, or the first error.
    pub fn into_result(self) -> Result<SimulationConfig, ConfigError> {
        match self.errors.into_iter().next() {
            None => Ok(self.config),
            Some(err) => Err(err),
        }
    }
}

/// Notification produced by [`ConfigStore::replace`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigChange {
    /// Configuration before the swap.
    pub previous: SimulationConfig,
    /// Configuration after the swap.
    pub current: SimulationConfig,
}

/// Owner of the effective configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: SimulationConfig,
}

impl ConfigStore {
    /// Create a store holding `config`.
    pub fn new(config: SimulationConfig) -> Self {
        Self { current: config }
    }

    /// Current effective configuration.
    pub fn read(&self) -> SimulationConfig {
        self.current
    }

    /// Validate a candidate, substituting defaults for invalid fields.
    ///
    /// - Unparseable fields: `Malformed`, default substituted.
    /// - Floors outside `i32`: `InvalidRange`, default substituted.
    /// - `min_floor > max_floor`: `InvalidRange` on `max_floor`, both floors
    ///   substituted.
    /// - Capacity below 1: `InvalidRange`, default substituted.
    /// - Cycle time outside `[1.0, 3.0]`: `InvalidSpeed`, default substituted.
    pub fn validate(&self, candidate: &ConfigCandidate) -> Validated {
        let mut errors = Vec::new();

        let mut min_floor =
            floor_field(candidate.min_floor, ConfigField::MinFloor, DEFAULT_MIN_FLOOR, &mut errors);
        let mut max_floor =
            floor_field(candidate.max_floor, ConfigField::MaxFloor, DEFAULT_MAX_FLOOR, &mut errors);
        if min_floor > max_floor {
            errors.push(ConfigError::InvalidRange {
                field: ConfigField::MaxFloor,
                value: i64::from(max_floor),
            });
            min_floor = DEFAULT_MIN_FLOOR;
            max_floor = DEFAULT_MAX_FLOOR;
        }

        let capacity = match candidate.capacity {
            None => {
                errors.push(ConfigError::Malformed { field: ConfigField::Capacity });
                DEFAULT_CAPACITY
            },
            Some(value) => match u32::try_from(value) {
                Ok(capacity) if capacity >= 1 => capacity,
                _ => {
                    errors.push(ConfigError::InvalidRange { field: ConfigField::Capacity, value });
                    DEFAULT_CAPACITY
                },
            },
        };

        let cycle_time = match candidate.cycle_time.filter(|v| !v.is_nan()) {
            None => {
                errors.push(ConfigError::Malformed { field: ConfigField::CycleTime });
                DEFAULT_CYCLE_TIME
            },
            Some(value) if (MIN_CYCLE_TIME..=MAX_CYCLE_TIME).contains(&value) => value,
            Some(value) => {
                errors.push(ConfigError::InvalidSpeed { value });
                DEFAULT_CYCLE_TIME
            },
        };

        Validated { config: SimulationConfig::new(min_floor, max_floor, capacity, cycle_time), errors }
    }

    /// Swap in a new configuration wholesale.
    pub fn replace(&mut self, config: SimulationConfig) -> ConfigChange {
        let previous = std::mem::replace(&mut self.current, config);
        tracing::debug!(?previous, current = ?self.current, "configuration replaced");
        ConfigChange { previous, current: self.current }
    }
}

fn floor_field(
    value: Option<i64>,
    field: ConfigField,
    default: i32,
    errors: &mut Vec<ConfigError>,
) -> i32 {
    match value {
        None => {
            errors.push(ConfigError::Malformed { field });
            default
        },
        Some(value) => i32::try_from(value).unwrap_or_else(|_| {
            errors.push(ConfigError::InvalidRange { field, value });
            default
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn candidate(min: i64, max: i64, capacity: i64, cycle_time: f64) -> ConfigCandidate {
        ConfigCandidate {
            min_floor: Some(min),
            max_floor: Some(max),
            capacity: Some(capacity),
            cycle_time: Some(cycle_time),
        }
    }

    #[test]
    fn valid_candidate_passes_through() {
        let store = ConfigStore::default();
        let validated = store.validate(&candidate(-2, 10, 4, 1.5));

        assert!(validated.is_valid());
        let config = validated.into_result().unwrap();
        assert_eq!(config.min_floor(), -2);
        assert_eq!(config.start_floor(), -2);
        assert_eq!(config.max_floor(), 10);
        assert_eq!(config.capacity(), 4);
    }

    #[test]
    fn zero_capacity_is_invalid_range() {
        let store = ConfigStore::default();
        let validated = store.validate(&candidate(0, 5, 0, 2.0));

        assert_eq!(validated.config.capacity(), DEFAULT_CAPACITY);
        assert_eq!(
            validated.into_result(),
            Err(ConfigError::InvalidRange { field: ConfigField::Capacity, value: 0 })
        );
    }

    #[test]
    fn fast_cycle_is_invalid_speed() {
        let store = ConfigStore::default();
        let validated = store.validate(&candidate(0, 5, 8, 0.5));

        assert!((validated.config.cycle_time() - DEFAULT_CYCLE_TIME).abs() < f64::EPSILON);
        assert_eq!(validated.errors, vec![ConfigError::InvalidSpeed { value: 0.5 }]);
    }

    #[test]
    fn unparseable_fields_take_defaults() {
        let store = ConfigStore::default();
        let validated = store.validate(&ConfigCandidate::parse("x", "", "8", "fast"));

        assert_eq!(validated.config, SimulationConfig::default());
        assert_eq!(
            validated.errors,
            vec![
                ConfigError::Malformed { field: ConfigField::MinFloor },
                ConfigError::Malformed { field: ConfigField::MaxFloor },
                ConfigError::Malformed { field: ConfigField::CycleTime },
            ]
        );
    }

    #[test]
    fn inverted_floor_range_resets_both_floors() {
        let store = ConfigStore::default();
        let validated = store.validate(&candidate(7, 3, 8, 2.0));

        assert_eq!(validated.config.min_floor(), DEFAULT_MIN_FLOOR);
        assert_eq!(validated.config.max_floor(), DEFAULT_MAX_FLOOR);
        assert_eq!(
            validated.errors,
            vec![ConfigError::InvalidRange { field: ConfigField::MaxFloor, value: 3 }]
        );
    }

    #[test]
    fn replace_reports_previous() {
        let mut store = ConfigStore::default();
        let next = SimulationConfig::new(1, 9, 4, 1.0);

        let change = store.replace(next);

        assert_eq!(change.previous, SimulationConfig::default());
        assert_eq!(change.current, next);
        assert_eq!(store.read(), next);
    }

    #[test]
    fn server_values_win_field_by_field() {
        let local = SimulationConfig::new(1, 5, 8, 2.0);
        let merged = local.with_server_values(Some(0), None, Some(6), None);

        assert_eq!(merged, SimulationConfig::new(0, 5, 6, 2.0));
        assert_eq!(merged.start_floor(), 0);
        assert!(local.differs_from(Some(0), None, None, None));
        assert!(!local.differs_from(Some(1), Some(5), Some(8), Some(2.0)));
        assert!(!local.differs_from(None, None, None, None));
    }
}
