//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the Sans-IO [`elevator_client::Client`] and adapts it
//! to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into client events.
//! - Encodes outbound messages and accumulates [`ChannelCommand`]s to be
//!   executed by the driver in the next I/O cycle.
//! - Interprets results from the client and converts them back into
//!   [`crate::AppEvent`]s to update the UI.

use elevator_client::{
    ChannelEvent, Client, ClientAction, ClientError, ClientEvent, SimulationConfig,
};

use crate::{AppAction, AppEvent, ChannelCommand};

/// Bridge between App and Client protocol logic.
pub struct Bridge {
    client: Client,
    outgoing: Vec<ChannelCommand>,
}

impl Bridge {
    /// Create a new Bridge with the initial configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { client: Client::new(config), outgoing: Vec::new() }
    }

    /// Underlying protocol client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let event = match action {
            AppAction::Connect { endpoint } => ClientEvent::Connect { endpoint },
            AppAction::Disconnect => ClientEvent::Disconnect,
            AppAction::ApplyConfig(candidate) => ClientEvent::ApplyConfig(candidate),
            AppAction::Call { floor, destination, num_passengers } => {
                ClientEvent::Call { floor, destination, num_passengers }
            },
            AppAction::ConfirmDecision { key, num_to_board } => {
                ClientEvent::ConfirmDecision { key, num_to_board }
            },
            AppAction::CancelDecision => ClientEvent::CancelDecision,
            AppAction::Render | AppAction::Quit | AppAction::PersistTheme(_) => return vec![],
        };

        let result = self.client.handle(event);
        self.handle_client_result(result)
    }

    /// Handle lifecycle or data from the channel.
    pub fn handle_channel(&mut self, event: ChannelEvent) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Channel(event));
        self.handle_client_result(result)
    }

    /// Local shutdown: declines a live decision and closes an open channel.
    pub fn shutdown(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Disconnect);
        self.handle_client_result(result)
    }

    /// Take pending channel commands.
    pub fn take_outgoing(&mut self) -> Vec<ChannelCommand> {
        std::mem::take(&mut self.outgoing)
    }

    fn handle_client_result(
        &mut self,
        result: Result<Vec<ClientAction>, ClientError>,
    ) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(ClientError::Decision(e)) => vec![AppEvent::DecisionRejected { message: e.to_string() }],
            Err(e) => vec![AppEvent::Error { message: e.to_string() }],
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for action in actions {
            match action {
                ClientAction::OpenChannel { attempt, endpoint } => {
                    self.outgoing.push(ChannelCommand::Open { attempt, endpoint });
                },
                ClientAction::Send { attempt, message } => match message.encode() {
                    Ok(text) => {
                        tracing::debug!(%attempt, kind = message.kind(), "queueing message");
                        self.outgoing.push(ChannelCommand::Send { attempt, text });
                    },
                    Err(err) => {
                        tracing::warn!(%err, kind = message.kind(), "failed to encode message");
                    },
                },
                ClientAction::CloseChannel { attempt } => {
                    self.outgoing.push(ChannelCommand::Close { attempt });
                },
                ClientAction::AbandonChannel { attempt } => {
                    self.outgoing.push(ChannelCommand::Abandon { attempt });
                },
                ClientAction::ConnectionChanged(state) => {
                    events.push(AppEvent::ConnectionChanged(state));
                },
                ClientAction::ConfigEditing { enabled } => {
                    events.push(AppEvent::ConfigEditing { enabled });
                },
                ClientAction::ConfigChanged(config) => {
                    events.push(AppEvent::ConfigChanged(config));
                },
                ClientAction::ConfigCorrected { config, errors } => {
                    events.push(AppEvent::ConfigCorrected { config, errors });
                },
                ClientAction::RebuildRequired(config) => {
                    events.push(AppEvent::RebuildRequired(config));
                },
                ClientAction::SnapshotUpdated(snapshot) => {
                    events.push(AppEvent::SnapshotUpdated(snapshot));
                },
                ClientAction::PromptDecision(pending) => {
                    events.push(AppEvent::DecisionPrompted(pending));
                },
                ClientAction::DismissDecision => events.push(AppEvent::DecisionDismissed),
                ClientAction::CallSent { floor } => events.push(AppEvent::CallSent { floor }),
                ClientAction::Alert { message } => events.push(AppEvent::Alert { message }),
            }
        }

        events
    }
}
