//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use elevator_client::ChannelEvent;

use crate::{App, AppAction, ChannelCommand, Theme};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal front-end and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite for the socket
/// - **Tests**: scripted input and an in-memory channel
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input and let the app react to it.
    ///
    /// Returns the actions produced, which may be empty (e.g. on a tick).
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Perform channel work requested by the protocol client.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be carried out at all.
    fn execute(
        &mut self,
        command: ChannelCommand,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next channel event, if one is ready. Never waits.
    fn recv_channel_event(&mut self) -> impl Future<Output = Option<ChannelEvent>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Store the display theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be written.
    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error>;

    /// Stop the channel and clean up resources.
    fn stop(&mut self);
}
