//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Protocol bridge to Client
//! - [`Driver`]: Platform-specific I/O

use elevator_client::SimulationConfig;

use crate::{App, AppAction, AppEvent, Bridge, Driver, Theme};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    bridge: Bridge,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and initial configuration.
    pub fn new(driver: D, endpoint: String, config: SimulationConfig, theme: Theme) -> Self {
        let app = App::new(endpoint, config, theme);
        let bridge = Bridge::new(config);
        Self { driver, app, bridge }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Processes actions and events between App and Bridge
    /// 3. Drains channel events into the Bridge
    /// 4. Executes channel commands through the driver
    ///
    /// On quit, an open channel is shut down through the protocol client
    /// before the driver stops, so a live decision is declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self, connect_on_start: bool) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let mut quit = false;
        if connect_on_start {
            let actions = self.app.connect();
            quit = self.process_actions(actions).await?;
        }

        while !quit {
            quit = self.process_cycle().await?;
        }

        self.shutdown().await?;
        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        while let Some(event) = self.driver.recv_channel_event().await {
            let events = self.bridge.handle_channel(event);
            self.execute_outgoing().await?;
            if self.process_bridge_events(events).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::PersistTheme(theme) => {
                        if let Err(err) = self.driver.persist_theme(theme) {
                            tracing::warn!(%err, "failed to save theme");
                            self.app.set_status(format!("Could not save theme: {err}"));
                        }
                    },

                    // Protocol operations go through the bridge
                    AppAction::Connect { .. }
                    | AppAction::Disconnect
                    | AppAction::ApplyConfig(_)
                    | AppAction::Call { .. }
                    | AppAction::ConfirmDecision { .. }
                    | AppAction::CancelDecision => {
                        let events = self.bridge.process_app_action(action);
                        for event in events {
                            let new_actions = self.app.handle(event);
                            pending_actions.extend(new_actions);
                        }
                        self.execute_outgoing().await?;
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Decline any live decision and close the channel before exiting.
    async fn shutdown(&mut self) -> Result<(), D::Error> {
        for event in self.bridge.shutdown() {
            let _ = self.app.handle(event);
        }
        self.execute_outgoing().await
    }

    /// Execute all pending channel commands.
    async fn execute_outgoing(&mut self) -> Result<(), D::Error> {
        let commands = self.bridge.take_outgoing();
        for command in commands {
            self.driver.execute(command).await?;
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
