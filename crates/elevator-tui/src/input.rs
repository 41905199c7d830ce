//! Input state and key handling for the TUI.
//!
//! This module owns the command line buffer and the current input mode, and
//! maps keys onto the [`App`] API. Command parsing happens here on Enter.
//!
//! # Modes
//!
//! ```text
//!              '/'                    Tab (editor enabled)
//!   Command <-------- Navigate --------------------------> Editor
//!      |     Enter/Esc    ^   ^        Enter/Esc             |
//!      +------------------+   +------------------------------+
//! ```
//!
//! A pending boarding decision overrides every mode: digits edit the answer,
//! Enter confirms and Esc declines.

use elevator_app::{App, AppAction, KeyInput};

use crate::commands::{self, Command};

/// Where keys go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Arrow keys move around the building.
    #[default]
    Navigate,
    /// Typing a slash command.
    Command,
    /// Typing into the configuration editor.
    Editor,
}

/// Input state for the TUI.
///
/// Manages the command buffer, cursor position and input mode.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current mode.
    mode: InputMode,
    /// Command text, without the leading `/`.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
}

impl InputState {
    /// Create a new input state in navigation mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Current command text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for ignored keys).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        if app.prompt().is_some() {
            return Self::handle_prompt_key(key, app);
        }

        match self.mode {
            InputMode::Navigate => self.handle_navigate_key(key, app),
            InputMode::Command => self.handle_command_key(key, app),
            InputMode::Editor => self.handle_editor_key(key, app),
        }
    }

    fn handle_prompt_key(key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => app.decision_input(c),
            KeyInput::Backspace => app.decision_backspace(),
            KeyInput::Enter => app.confirm_decision(),
            KeyInput::Esc => app.cancel_decision(),
            KeyInput::Tab
            | KeyInput::Left
            | KeyInput::Right
            | KeyInput::Up
            | KeyInput::Down => vec![],
        }
    }

    fn handle_navigate_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Up => app.select_floor_up(),
            KeyInput::Down => app.select_floor_down(),
            KeyInput::Left => app.cycle_destination(-1),
            KeyInput::Right => app.cycle_destination(1),
            KeyInput::Enter => app.call_selected(),
            KeyInput::Char('+' | '=') => app.adjust_passengers(1),
            KeyInput::Char('-' | '_') => app.adjust_passengers(-1),
            KeyInput::Char('/') => {
                self.mode = InputMode::Command;
                vec![AppAction::Render]
            },
            KeyInput::Char('c') => app.toggle_connection(),
            KeyInput::Char('t') => app.toggle_theme(),
            KeyInput::Char('q') | KeyInput::Esc => app.quit(),
            KeyInput::Tab => {
                if app.is_editing_enabled() {
                    self.mode = InputMode::Editor;
                } else {
                    app.set_status("Disconnect to edit the configuration");
                }
                vec![AppAction::Render]
            },
            KeyInput::Char(_) | KeyInput::Backspace => vec![],
        }
    }

    fn handle_command_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
                    self.cursor -= c.len_utf8();
                    self.buffer.remove(self.cursor);
                } else if self.buffer.is_empty() {
                    self.mode = InputMode::Navigate;
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
                    self.cursor -= c.len_utf8();
                }
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if let Some(c) = self.buffer[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
                vec![AppAction::Render]
            },
            KeyInput::Esc => {
                self.reset_command();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab | KeyInput::Up | KeyInput::Down => vec![],
        }
    }

    fn handle_editor_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        if !app.is_editing_enabled() {
            self.mode = InputMode::Navigate;
            return self.handle_navigate_key(key, app);
        }

        match key {
            KeyInput::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => app.editor_input(c),
            KeyInput::Backspace => app.editor_backspace(),
            KeyInput::Tab | KeyInput::Down => app.editor_focus_next(),
            KeyInput::Enter => {
                self.mode = InputMode::Navigate;
                app.apply_config()
            },
            KeyInput::Esc => {
                self.mode = InputMode::Navigate;
                vec![AppAction::Render]
            },
            KeyInput::Char(_) | KeyInput::Left | KeyInput::Right | KeyInput::Up => vec![],
        }
    }

    fn reset_command(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.mode = InputMode::Navigate;
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.reset_command();

        if text.trim().is_empty() {
            return vec![AppAction::Render];
        }

        match commands::parse(&text) {
            Command::Connect { url } => {
                if let Some(url) = url {
                    app.set_endpoint(url);
                }
                app.connect()
            },
            Command::Disconnect => app.disconnect(),
            Command::Config { values } => {
                if !app.is_editing_enabled() {
                    app.set_status("Disconnect to edit the configuration");
                    return vec![AppAction::Render];
                }
                let _ = app.set_config_fields(values);
                app.apply_config()
            },
            Command::Theme => app.toggle_theme(),
            Command::Quit => app.quit(),
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: /{input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }
}
