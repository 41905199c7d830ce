//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Mirrors the connection state, effective configuration and latest
//!   snapshot for rendering.
//! - Owns per-floor call drafts, the configuration editor and the boarding
//!   decision prompt.
//! - Gates user input while a decision prompt is shown.
//! - Stores terminal dimensions to handle resize events.

use std::collections::BTreeMap;

use elevator_client::{
    ConnectionError, ConnectionState, DecisionError, ElevatorSnapshot, SimulationConfig,
};
use elevator_proto::display_floor;

use crate::{AppAction, AppEvent, CallDraft, ConfigEditor, DecisionPrompt, Theme};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a terminal or socket.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection state.
    state: ConnectionState,
    /// WebSocket endpoint used by [`App::connect`].
    endpoint: String,
    /// Effective configuration.
    config: SimulationConfig,
    /// Configuration editor text.
    editor: ConfigEditor,
    /// Whether the editor accepts input. Disabled while connected.
    editing_enabled: bool,
    /// Latest snapshot. `None` while disconnected or before the first one.
    snapshot: Option<ElevatorSnapshot>,
    /// Live boarding decision prompt.
    prompt: Option<DecisionPrompt>,
    /// Per-floor call drafts. Floors without an entry use the default draft.
    drafts: BTreeMap<i32, CallDraft>,
    /// Floor row under the cursor.
    selected_floor: i32,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Display theme.
    theme: Theme,
}

impl App {
    /// Create a new App for `endpoint` showing `config`.
    pub fn new(endpoint: String, config: SimulationConfig, theme: Theme) -> Self {
        Self {
            state: ConnectionState::Idle,
            endpoint,
            config,
            editor: ConfigEditor::new(&config),
            editing_enabled: true,
            snapshot: None,
            prompt: None,
            drafts: BTreeMap::new(),
            selected_floor: config.start_floor(),
            terminal_size: (80, 24),
            status_message: None,
            theme,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::ConnectionChanged(state) => {
                self.state = state;
                let status = match state {
                    ConnectionState::Connecting => Some(format!("Connecting to {}...", self.endpoint)),
                    ConnectionState::Open => Some("Connected".to_string()),
                    ConnectionState::Closed => Some("Disconnected".to_string()),
                    ConnectionState::Idle | ConnectionState::Closing | ConnectionState::Errored => {
                        None
                    },
                };
                if status.is_some() {
                    self.status_message = status;
                }
                if !state.is_active() {
                    self.snapshot = None;
                    self.prompt = None;
                }
                vec![AppAction::Render]
            },
            AppEvent::ConfigEditing { enabled } => {
                self.editing_enabled = enabled;
                if enabled {
                    self.editor.load(&self.config);
                }
                vec![AppAction::Render]
            },
            AppEvent::ConfigChanged(config) => {
                self.config = config;
                self.editor.load(&config);
                vec![AppAction::Render]
            },
            AppEvent::ConfigCorrected { config, errors } => {
                self.editor.load(&config);
                let detail =
                    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
                self.status_message = Some(format!("Invalid configuration, defaults restored: {detail}"));
                vec![AppAction::Render]
            },
            AppEvent::RebuildRequired(config) => {
                self.rebuild(&config);
                vec![AppAction::Render]
            },
            AppEvent::SnapshotUpdated(snapshot) => {
                self.snapshot = Some(snapshot);
                vec![AppAction::Render]
            },
            AppEvent::DecisionPrompted(pending) => {
                self.prompt = Some(DecisionPrompt::new(pending));
                vec![AppAction::Render]
            },
            AppEvent::DecisionDismissed => {
                self.prompt = None;
                vec![AppAction::Render]
            },
            AppEvent::DecisionRejected { message } => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.error = Some(message);
                }
                vec![AppAction::Render]
            },
            AppEvent::CallSent { floor } => {
                if let Some(draft) = self.drafts.get_mut(&floor) {
                    draft.reset();
                }
                self.status_message = Some(format!("Called elevator from floor {}", display_floor(floor)));
                vec![AppAction::Render]
            },
            AppEvent::Alert { message } => {
                self.status_message = Some(message);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Drop drafts and selections that no longer fit the floor range.
    fn rebuild(&mut self, config: &SimulationConfig) {
        self.config = *config;
        self.drafts.retain(|floor, _| config.contains_floor(*floor));
        for (floor, draft) in &mut self.drafts {
            if draft.destination.is_some_and(|d| d == *floor || !config.contains_floor(d)) {
                draft.destination = None;
            }
        }
        self.selected_floor = self.selected_floor.min(config.max_floor()).max(config.min_floor());
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Use `endpoint` for subsequent connects.
    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    /// Connect to the simulation. Refused while a decision is pending.
    pub fn connect(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() {
            return self.refuse_while_prompted();
        }
        vec![AppAction::Connect { endpoint: self.endpoint.clone() }, AppAction::Render]
    }

    /// Disconnect from the simulation. Refused while a decision is pending.
    pub fn disconnect(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() {
            return self.refuse_while_prompted();
        }
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Connect when disconnected, disconnect when connected.
    pub fn toggle_connection(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() {
            return self.refuse_while_prompted();
        }
        match self.state {
            ConnectionState::Open => self.disconnect(),
            ConnectionState::Connecting | ConnectionState::Closing => {
                self.status_message = Some(format!("Connection is {}", self.state));
                vec![AppAction::Render]
            },
            ConnectionState::Idle | ConnectionState::Closed | ConnectionState::Errored => {
                self.connect()
            },
        }
    }

    /// Apply the editor values.
    pub fn apply_config(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() {
            return self.refuse_while_prompted();
        }
        vec![AppAction::ApplyConfig(self.editor.candidate()), AppAction::Render]
    }

    /// Overwrite the editor values. Ignored while editing is disabled.
    pub fn set_config_fields(&mut self, values: [String; 4]) -> Vec<AppAction> {
        if !self.editing_enabled {
            return vec![];
        }
        self.editor.set_all(values);
        vec![AppAction::Render]
    }

    /// Type into the focused editor field.
    pub fn editor_input(&mut self, c: char) -> Vec<AppAction> {
        if !self.editing_enabled {
            return vec![];
        }
        self.editor.push(c);
        vec![AppAction::Render]
    }

    /// Delete from the focused editor field.
    pub fn editor_backspace(&mut self) -> Vec<AppAction> {
        if !self.editing_enabled {
            return vec![];
        }
        self.editor.pop();
        vec![AppAction::Render]
    }

    /// Move focus to the next editor field.
    pub fn editor_focus_next(&mut self) -> Vec<AppAction> {
        if !self.editing_enabled {
            return vec![];
        }
        self.editor.focus_next();
        vec![AppAction::Render]
    }

    /// Move the cursor one floor up.
    pub fn select_floor_up(&mut self) -> Vec<AppAction> {
        self.selected_floor = self.selected_floor.saturating_add(1).min(self.config.max_floor());
        vec![AppAction::Render]
    }

    /// Move the cursor one floor down.
    pub fn select_floor_down(&mut self) -> Vec<AppAction> {
        self.selected_floor = self.selected_floor.saturating_sub(1).max(self.config.min_floor());
        vec![AppAction::Render]
    }

    /// Cycle the selected row's destination forward (`step > 0`) or back.
    pub fn cycle_destination(&mut self, step: i32) -> Vec<AppAction> {
        let floor = self.selected_floor;
        let config = self.config;
        self.drafts.entry(floor).or_default().cycle_destination(&config, floor, step);
        vec![AppAction::Render]
    }

    /// Change the selected row's passenger count.
    pub fn adjust_passengers(&mut self, delta: i32) -> Vec<AppAction> {
        self.drafts.entry(self.selected_floor).or_default().adjust(delta);
        vec![AppAction::Render]
    }

    /// Hail the elevator from the selected row using its draft.
    pub fn call_selected(&mut self) -> Vec<AppAction> {
        if self.prompt.is_some() {
            return self.refuse_while_prompted();
        }
        let floor = self.selected_floor;
        let draft = self.draft(floor);
        vec![
            AppAction::Call {
                floor,
                destination: draft.destination,
                num_passengers: i64::from(draft.num_passengers),
            },
            AppAction::Render,
        ]
    }

    /// Type into the decision prompt. Only digits and a leading sign are kept.
    pub fn decision_input(&mut self, c: char) -> Vec<AppAction> {
        let Some(prompt) = self.prompt.as_mut() else {
            return vec![];
        };
        if c.is_ascii_digit() || (c == '-' && prompt.input.is_empty()) {
            prompt.input.push(c);
        }
        vec![AppAction::Render]
    }

    /// Delete from the decision prompt input.
    pub fn decision_backspace(&mut self) -> Vec<AppAction> {
        let Some(prompt) = self.prompt.as_mut() else {
            return vec![];
        };
        prompt.input.pop();
        vec![AppAction::Render]
    }

    /// Confirm the typed answer. A non-integer keeps the prompt open.
    pub fn confirm_decision(&mut self) -> Vec<AppAction> {
        let Some(prompt) = self.prompt.as_mut() else {
            return vec![];
        };
        match prompt.input.trim().parse::<i64>() {
            Ok(num_to_board) => {
                vec![
                    AppAction::ConfirmDecision { key: prompt.pending.key(), num_to_board },
                    AppAction::Render,
                ]
            },
            Err(_) => {
                let err = DecisionError::NotAnInteger { max: prompt.pending.can_board };
                prompt.error = Some(err.to_string());
                vec![AppAction::Render]
            },
        }
    }

    /// Decline the live decision (boards nobody).
    pub fn cancel_decision(&self) -> Vec<AppAction> {
        if self.prompt.is_none() {
            return vec![];
        }
        vec![AppAction::CancelDecision, AppAction::Render]
    }

    /// Switch between light and dark.
    pub fn toggle_theme(&mut self) -> Vec<AppAction> {
        self.theme = self.theme.toggled();
        vec![AppAction::PersistTheme(self.theme), AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    fn refuse_while_prompted(&mut self) -> Vec<AppAction> {
        self.status_message = Some(ConnectionError::DecisionPending.to_string());
        vec![AppAction::Render]
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// WebSocket endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Effective configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Configuration editor.
    pub fn editor(&self) -> &ConfigEditor {
        &self.editor
    }

    /// Whether the configuration editor accepts input.
    pub fn is_editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    /// Latest snapshot. `None` while disconnected.
    pub fn snapshot(&self) -> Option<&ElevatorSnapshot> {
        self.snapshot.as_ref()
    }

    /// Live decision prompt. `None` if no decision is pending.
    pub fn prompt(&self) -> Option<&DecisionPrompt> {
        self.prompt.as_ref()
    }

    /// Call draft for `floor`.
    pub fn draft(&self, floor: i32) -> CallDraft {
        self.drafts.get(&floor).copied().unwrap_or_default()
    }

    /// Floor row under the cursor.
    pub fn selected_floor(&self) -> i32 {
        self.selected_floor
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Display theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }
}
