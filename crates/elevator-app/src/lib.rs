//! Application layer for the elevator visualisation
//!
//! Pure state machines and a generic runtime for UI and protocol
//! orchestration. The same code runs against a real terminal and socket in
//! production and against scripted drivers in tests.
//!
//! # Components
//!
//! - [`App`]: UI state machine (floor selection, call drafts, config editor,
//!   decision prompt, theme)
//! - [`Bridge`]: Protocol bridge (translates App actions to Client events)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod command;
mod driver;
mod event;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use command::ChannelCommand;
pub use driver::Driver;
pub use elevator_client::{ChannelEvent, ConnectionState};
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::Runtime;
pub use state::{CONFIG_FIELDS, CallDraft, ConfigEditor, DecisionPrompt, Theme};
