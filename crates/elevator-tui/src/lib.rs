//! Terminal UI for the elevator simulation
//!
//! A thin shell over [`elevator_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`elevator_app::Runtime`]
//!
//! This crate only handles key mapping, rendering and the preference file.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod prefs;
pub mod terminal;
pub mod ui;

pub use elevator_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use input::{InputMode, InputState};
pub use terminal::{TerminalDriver, TerminalError};
