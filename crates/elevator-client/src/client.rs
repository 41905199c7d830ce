//! Client state machine.
//!
//! The `Client` is the top-level state machine. It owns the configuration
//! store, the connection manager, the snapshot mirror and the decision
//! protocol, and routes every event to the component that owns the state it
//! touches.

use elevator_proto::{ClientMessage, ServerMessage};

use crate::{
    call::CallRequestBuilder,
    config::{ConfigCandidate, ConfigStore, SimulationConfig},
    connection::{AttemptId, ConnectionAction, ConnectionManager, ConnectionState, Teardown, TeardownKind},
    decision::{DecisionProtocol, PendingDecision, RequestOutcome, Resolution},
    error::{ClientError, ConnectionError},
    event::{ChannelEvent, ClientAction, ClientEvent},
    sync::{ElevatorSnapshot, StateSyncEngine},
};

/// Client for the elevator simulation stream.
#[derive(Debug, Clone, Default)]
pub struct Client {
    /// Effective configuration.
    config: ConfigStore,
    /// Channel lifecycle.
    connection: ConnectionManager,
    /// Latest snapshot.
    sync: StateSyncEngine,
    /// Pending boarding decisions.
    decisions: DecisionProtocol,
}

impl Client {
    /// Create a disconnected client with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config: ConfigStore::new(config),
            connection: ConnectionManager::new(),
            sync: StateSyncEngine::new(),
            decisions: DecisionProtocol::new(),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> SimulationConfig {
        self.config.read()
    }

    /// Connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Current connection attempt. `None` before the first connect.
    pub fn connection_attempt(&self) -> Option<AttemptId> {
        self.connection.attempt()
    }

    /// Latest snapshot. `None` before the first snapshot of a connection.
    pub fn snapshot(&self) -> Option<&ElevatorSnapshot> {
        self.sync.latest()
    }

    /// Live boarding decision.
    pub fn pending_decision(&self) -> Option<&PendingDecision> {
        self.decisions.pending()
    }

    /// Process an event and return actions for the caller.
    ///
    /// # Errors
    ///
    /// Returns an error for user intents that are rejected (invalid call,
    /// out-of-range decision, connect while open, ...). Problems with inbound
    /// messages are logged and never returned.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Connect { endpoint } => self.handle_connect(endpoint),
            ClientEvent::Disconnect => Ok(self.handle_disconnect()),
            ClientEvent::Channel(event) => Ok(self.handle_channel(event)),
            ClientEvent::ApplyConfig(candidate) => self.handle_apply_config(&candidate),
            ClientEvent::Call { floor, destination, num_passengers } => {
                self.handle_call(floor, destination, num_passengers)
            },
            ClientEvent::ConfirmDecision { key, num_to_board } => {
                let resolution = self.decisions.confirm(key, num_to_board)?;
                Ok(self.resolve_decision(resolution))
            },
            ClientEvent::CancelDecision => {
                let resolution = self.decisions.cancel()?;
                Ok(self.resolve_decision(resolution))
            },
        }
    }

    fn handle_connect(&mut self, endpoint: String) -> Result<Vec<ClientAction>, ClientError> {
        let mut actions = Self::convert_connection_actions(self.connection.connect(endpoint)?);
        actions.push(ClientAction::ConnectionChanged(self.connection.state()));
        Ok(actions)
    }

    /// Local disconnect. A live decision is declined while the channel is
    /// still Open, before the close is requested.
    fn handle_disconnect(&mut self) -> Vec<ClientAction> {
        if !self.connection.is_open() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let was_awaiting = self.decisions.is_awaiting();
        if let Some(decline) = self.decisions.teardown(true) {
            self.send(ClientMessage::BoardingDecision(decline), &mut actions);
        }
        if was_awaiting {
            actions.push(ClientAction::DismissDecision);
        }

        let close = self.connection.disconnect();
        actions.extend(Self::convert_connection_actions(close));
        actions.push(ClientAction::ConnectionChanged(self.connection.state()));
        actions
    }

    fn handle_channel(&mut self, event: ChannelEvent) -> Vec<ClientAction> {
        match event {
            ChannelEvent::Opened { attempt } => self.handle_opened(attempt),
            ChannelEvent::Message { attempt, text } => {
                if self.connection.attempt() != Some(attempt) || !self.connection.is_open() {
                    tracing::debug!(%attempt, "ignoring message from stale or closed channel");
                    return Vec::new();
                }
                self.handle_message(&text)
            },
            ChannelEvent::Error { attempt, reason } => self
                .connection
                .handle_error(attempt, reason)
                .map(|teardown| self.handle_teardown(teardown))
                .unwrap_or_default(),
            ChannelEvent::Closed { attempt } => self
                .connection
                .handle_close(attempt)
                .map(|teardown| self.handle_teardown(teardown))
                .unwrap_or_default(),
        }
    }

    /// Channel open: announce the configuration, or bail out if it is invalid.
    fn handle_opened(&mut self, attempt: AttemptId) -> Vec<ClientAction> {
        if !self.connection.handle_open(attempt) {
            return Vec::new();
        }

        let mut actions = vec![
            ClientAction::ConnectionChanged(ConnectionState::Open),
            ClientAction::ConfigEditing { enabled: false },
        ];

        let current = self.config.read();
        match self.config.validate(&ConfigCandidate::from(&current)).into_result() {
            Ok(config) => {
                tracing::info!(?config, "sending configuration");
                self.send(ClientMessage::Configure(config.to_configure()), &mut actions);
                actions.push(ClientAction::RebuildRequired(config));
            },
            Err(err) => {
                let err = ConnectionError::ConfigInvalidOnConnect(err);
                tracing::warn!(%err, "aborting connection");
                actions.push(ClientAction::Alert { message: err.to_string() });
                actions.extend(self.handle_disconnect());
            },
        }
        actions
    }

    fn handle_message(&mut self, text: &str) -> Vec<ClientAction> {
        let message = match ServerMessage::decode(text) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(%err, "dropping unparseable message");
                return Vec::new();
            },
        };

        match message {
            ServerMessage::DecisionNeeded(req) => match self.decisions.request(req) {
                RequestOutcome::Presented(pending) | RequestOutcome::Refreshed(pending) => {
                    tracing::info!(key = ?pending.key(), can_board = pending.can_board, "decision needed");
                    vec![ClientAction::PromptDecision(pending)]
                },
                RequestOutcome::Queued { .. } => Vec::new(),
            },
            ServerMessage::Error { message } => {
                tracing::warn!(%message, "server error");
                vec![ClientAction::Alert { message: format!("Server error: {message}") }]
            },
            ServerMessage::Info { message } => {
                tracing::info!(%message, "server info");
                Vec::new()
            },
            ServerMessage::Snapshot(raw) => {
                let outcome = self.sync.apply(&mut self.config, *raw);
                let mut actions = Vec::with_capacity(3);
                if let Some(change) = outcome.drift {
                    actions.push(ClientAction::ConfigChanged(change.current));
                    actions.push(ClientAction::RebuildRequired(change.current));
                }
                actions.push(ClientAction::SnapshotUpdated(outcome.snapshot));
                actions
            },
        }
    }

    /// Single teardown path for channel error and close. Nothing is sent: the
    /// channel is already gone.
    fn handle_teardown(&mut self, teardown: Teardown) -> Vec<ClientAction> {
        let mut actions = Vec::new();

        if let TeardownKind::Errored { reason } = &teardown.kind {
            actions.push(ClientAction::AbandonChannel { attempt: teardown.attempt });
            let err = ConnectionError::Channel(reason.clone());
            actions.push(ClientAction::Alert { message: err.to_string() });
        }

        let was_awaiting = self.decisions.is_awaiting();
        // The channel is no longer open here, so this never yields a message.
        let _ = self.decisions.teardown(false);
        if was_awaiting {
            actions.push(ClientAction::DismissDecision);
        }

        self.sync.reset();
        actions.push(ClientAction::ConnectionChanged(self.connection.state()));
        actions.push(ClientAction::ConfigEditing { enabled: true });
        actions
    }

    fn handle_apply_config(
        &mut self,
        candidate: &ConfigCandidate,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if self.connection.state().is_active() {
            return Err(ConnectionError::ReconnectRequired.into());
        }

        let validated = self.config.validate(candidate);
        if !validated.is_valid() {
            tracing::info!(errors = ?validated.errors, "configuration corrected");
            return Ok(vec![ClientAction::ConfigCorrected {
                config: validated.config,
                errors: validated.errors,
            }]);
        }

        let change = self.config.replace(validated.config);
        Ok(vec![
            ClientAction::ConfigChanged(change.current),
            ClientAction::RebuildRequired(change.current),
        ])
    }

    fn handle_call(
        &mut self,
        floor: i32,
        destination: Option<i32>,
        num_passengers: i64,
    ) -> Result<Vec<ClientAction>, ClientError> {
        if !self.connection.is_open() {
            return Err(ConnectionError::NotConnected { state: self.connection.state() }.into());
        }

        let config = self.config.read();
        let request = CallRequestBuilder::new(&config).build(floor, destination, num_passengers)?;
        tracing::info!(?request, "calling elevator");

        let send = self.connection.send(ClientMessage::Call(request.into()))?;
        let mut actions = Self::convert_connection_actions(vec![send]);
        actions.push(ClientAction::CallSent { floor });
        Ok(actions)
    }

    /// Send the response (if any) and present the next queued decision.
    fn resolve_decision(&mut self, resolution: Resolution) -> Vec<ClientAction> {
        let mut actions = Vec::new();

        if let Some(response) = resolution.response {
            if self.connection.is_open() {
                tracing::info!(?response, "sending boarding decision");
                self.send(ClientMessage::BoardingDecision(response), &mut actions);
            } else {
                tracing::debug!(?response, "channel closed, dropping boarding decision");
            }
        }

        actions.push(ClientAction::DismissDecision);
        if let Some(next) = resolution.next {
            actions.push(ClientAction::PromptDecision(next));
        }
        actions
    }

    /// Queue a message, logging instead of failing if the channel is not open.
    fn send(&self, message: ClientMessage, actions: &mut Vec<ClientAction>) {
        match self.connection.send(message) {
            Ok(action) => actions.extend(Self::convert_connection_actions(vec![action])),
            Err(err) => tracing::warn!(%err, "message not sent"),
        }
    }

    fn convert_connection_actions(actions: Vec<ConnectionAction>) -> Vec<ClientAction> {
        actions
            .into_iter()
            .map(|action| match action {
                ConnectionAction::Open { attempt, endpoint } => {
                    ClientAction::OpenChannel { attempt, endpoint }
                },
                ConnectionAction::Send { attempt, message } => {
                    ClientAction::Send { attempt, message }
                },
                ConnectionAction::Close { attempt } => ClientAction::CloseChannel { attempt },
                ConnectionAction::Abandon { attempt } => ClientAction::AbandonChannel { attempt },
            })
            .collect()
    }
}
