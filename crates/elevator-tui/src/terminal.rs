//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The channel uses the WebSocket
//! transport from `elevator-client`.

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    path::PathBuf,
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use elevator_app::{App, AppAction, AppEvent, ChannelCommand, ChannelEvent, Driver, Theme};
use elevator_client::transport::WebSocketTransport;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{InputState, KeyInput, prefs, ui};

/// How long a graceful close may take before the socket is dropped.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Preference file error.
    #[error("preferences error: {0}")]
    Prefs(#[from] prefs::PrefsError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the socket
/// (tokio-tungstenite). Owns the input state for key handling.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    transport: WebSocketTransport,
    channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
    /// Channel events received while waiting for input.
    ready: VecDeque<ChannelEvent>,
    input_state: InputState,
    prefs_path: PathBuf,
}

impl TerminalDriver {
    /// Create a new terminal driver. Must be called within a tokio runtime.
    pub fn new(prefs_path: PathBuf) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();
        let (transport, channel_events) = WebSocketTransport::new();

        Ok(Self {
            terminal,
            event_stream,
            transport,
            channel_events,
            ready: VecDeque::new(),
            input_state: InputState::new(),
            prefs_path,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let timeout = Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Channel activity wakes the loop; the runtime drains it next
            Some(event) = self.channel_events.recv() => {
                self.ready.push_back(event);
                Ok(vec![])
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    async fn execute(&mut self, command: ChannelCommand) -> Result<(), Self::Error> {
        let result = match command {
            ChannelCommand::Open { attempt, endpoint } => {
                tracing::info!(%attempt, %endpoint, "opening channel");
                self.transport.open(attempt, endpoint);
                Ok(())
            },
            ChannelCommand::Send { attempt, text } => self.transport.send(attempt, text),
            ChannelCommand::Close { attempt } => {
                let result = self.transport.close(attempt);
                if result.is_ok() {
                    self.transport.finish(attempt, CLOSE_GRACE).await;
                }
                result
            },
            ChannelCommand::Abandon { attempt } => {
                self.transport.abandon(attempt);
                Ok(())
            },
        };

        // The socket task may already be gone; its Closed event is on the way
        if let Err(err) = result {
            tracing::warn!(%err, "channel command dropped");
        }
        Ok(())
    }

    async fn recv_channel_event(&mut self) -> Option<ChannelEvent> {
        self.ready.pop_front().or_else(|| self.channel_events.try_recv().ok())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error> {
        prefs::save(&self.prefs_path, theme)?;
        Ok(())
    }

    fn stop(&mut self) {
        self.transport.stop();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
