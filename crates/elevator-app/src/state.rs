//! Observable application state types.
//!
//! These structures are the view model: the subset of client state needed to
//! render the building, plus transient UI state (drafts, editor text, prompt
//! input) that never reaches the protocol until the user commits it.

use elevator_client::{ConfigCandidate, ConfigField, PendingDecision, SimulationConfig};

/// Per-floor call draft: the destination picker and passenger counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallDraft {
    /// Selected destination. `None` until the user picks one.
    pub destination: Option<i32>,
    /// Group size, never below 1.
    pub num_passengers: u32,
}

impl Default for CallDraft {
    fn default() -> Self {
        Self { destination: None, num_passengers: 1 }
    }
}

impl CallDraft {
    /// Change the passenger count by `delta`, stopping at 1.
    pub fn adjust(&mut self, delta: i32) {
        self.num_passengers = self.num_passengers.saturating_add_signed(delta).max(1);
    }

    /// Move the destination to the next (`step > 0`) or previous floor in
    /// `config`, skipping `floor` itself. Starts from the nearest end when
    /// nothing is selected.
    pub fn cycle_destination(&mut self, config: &SimulationConfig, floor: i32, step: i32) {
        let candidates: Vec<i32> = config.floors().filter(|f| *f != floor).collect();
        if candidates.is_empty() {
            return;
        }

        let len = candidates.len() as i64;
        let next = match self.destination.and_then(|d| candidates.iter().position(|f| *f == d)) {
            Some(idx) => (idx as i64 + i64::from(step.signum())).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.destination = candidates.get(next as usize).copied();
    }

    /// Back to defaults after a successful call.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Editable configuration fields, in display order.
pub const CONFIG_FIELDS: [ConfigField; 4] =
    [ConfigField::MinFloor, ConfigField::MaxFloor, ConfigField::Capacity, ConfigField::CycleTime];

/// Text editor for the pre-connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEditor {
    values: [String; 4],
    focus: usize,
}

impl ConfigEditor {
    /// Editor showing `config`.
    pub fn new(config: &SimulationConfig) -> Self {
        let mut editor = Self { values: Default::default(), focus: 0 };
        editor.load(config);
        editor
    }

    /// Replace every field with the values of `config`.
    pub fn load(&mut self, config: &SimulationConfig) {
        self.values = [
            config.min_floor().to_string(),
            config.max_floor().to_string(),
            config.capacity().to_string(),
            format!("{:.1}", config.cycle_time()),
        ];
    }

    /// Field text, in [`CONFIG_FIELDS`] order.
    pub fn values(&self) -> &[String; 4] {
        &self.values
    }

    /// Index of the focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Focus the next field, wrapping around.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.values.len();
    }

    /// Append to the focused field.
    pub fn push(&mut self, c: char) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(c);
        }
    }

    /// Delete the last character of the focused field.
    pub fn pop(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    /// Overwrite all fields.
    pub fn set_all(&mut self, values: [String; 4]) {
        self.values = values;
    }

    /// Parse the fields.
    pub fn candidate(&self) -> ConfigCandidate {
        let [min, max, capacity, cycle_time] = &self.values;
        ConfigCandidate::parse(min, max, capacity, cycle_time)
    }
}

/// Boarding decision prompt with its input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPrompt {
    /// Decision being answered.
    pub pending: PendingDecision,
    /// Typed answer. Starts at `can_board`.
    pub input: String,
    /// Reason the last answer was rejected.
    pub error: Option<String>,
}

impl DecisionPrompt {
    /// Prompt for `pending`, pre-filled with the free space.
    pub fn new(pending: PendingDecision) -> Self {
        Self { pending, input: pending.can_board.to_string(), error: None }
    }
}

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
