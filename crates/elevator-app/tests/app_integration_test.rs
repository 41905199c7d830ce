//! Integration tests for App, Bridge and Runtime behavior.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - App state reflects expected state
//! - The exact text frames the channel would have carried
//! - Decisions are answered at most once

#![allow(clippy::unwrap_used)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use elevator_app::{
    App, AppAction, Bridge, ChannelCommand, ChannelEvent, ConnectionState, Driver,
    Runtime, Theme,
};
use elevator_client::{AttemptId, SimulationConfig};
use serde_json::{Value, json};

const URL: &str = "ws://localhost:5050/ws";

fn decision_needed() -> Value {
    json!({
        "type": "decision_needed",
        "data": {"floor": 2, "direction": "up", "destination": 5, "num_waiting": 5, "can_board": 3}
    })
}

fn snapshot() -> Value {
    json!({
        "current_floor": 1,
        "direction": 1,
        "current_load": 2,
        "stops_requested_display": ["3"],
        "waiting_passengers": {"2": {"up": [[5, 3]], "down": []}}
    })
}

/// Process actions from App through Bridge and update App state.
fn process_actions(app: &mut App, bridge: &mut Bridge, actions: Vec<AppAction>) -> Vec<ChannelCommand> {
    let mut pending = actions;
    while !pending.is_empty() {
        for action in std::mem::take(&mut pending) {
            match action {
                AppAction::Render | AppAction::Quit | AppAction::PersistTheme(_) => {},
                action => {
                    for event in bridge.process_app_action(action) {
                        pending.extend(app.handle(event));
                    }
                },
            }
        }
    }

    bridge.take_outgoing()
}

/// Feed a channel event through the Bridge into the App.
fn channel(app: &mut App, bridge: &mut Bridge, event: ChannelEvent) -> Vec<ChannelCommand> {
    for event in bridge.handle_channel(event) {
        let _ = app.handle(event);
    }
    bridge.take_outgoing()
}

/// Connected App and Bridge with the configure frame already sent.
fn connected() -> (App, Bridge, AttemptId) {
    let config = SimulationConfig::default();
    let mut app = App::new(URL.into(), config, Theme::Light);
    let mut bridge = Bridge::new(config);

    let actions = app.connect();
    let commands = process_actions(&mut app, &mut bridge, actions);
    let attempt = match commands.as_slice() {
        [ChannelCommand::Open { attempt, .. }] => *attempt,
        other => panic!("expected open, got {other:?}"),
    };
    let _ = channel(&mut app, &mut bridge, ChannelEvent::Opened { attempt });
    (app, bridge, attempt)
}

fn deliver(app: &mut App, bridge: &mut Bridge, attempt: AttemptId, value: &Value) -> Vec<ChannelCommand> {
    channel(app, bridge, ChannelEvent::Message { attempt, text: value.to_string() })
}

fn sent_texts(commands: &[ChannelCommand]) -> Vec<Value> {
    commands
        .iter()
        .filter_map(|c| match c {
            ChannelCommand::Send { text, .. } => Some(serde_json::from_str(text).unwrap()),
            _ => None,
        })
        .collect()
}

#[test]
fn connect_locks_editor_and_sends_configure() {
    let config = SimulationConfig::default();
    let mut app = App::new(URL.into(), config, Theme::Light);
    let mut bridge = Bridge::new(config);

    let actions = app.connect();
    let commands = process_actions(&mut app, &mut bridge, actions);
    assert_eq!(app.connection_state(), ConnectionState::Connecting);
    let [ChannelCommand::Open { attempt, endpoint }] = commands.as_slice() else {
        panic!("expected open, got {commands:?}");
    };
    assert_eq!(endpoint, URL);

    let commands = channel(&mut app, &mut bridge, ChannelEvent::Opened { attempt: *attempt });

    assert_eq!(sent_texts(&commands), vec![json!({
        "type": "configure",
        "min_floor": 0,
        "max_floor": 5,
        "start_floor": 0,
        "capacity": 8,
        "cycle_time": 2.0
    })]);
    assert_eq!(app.connection_state(), ConnectionState::Open);
    assert!(!app.is_editing_enabled());
}

#[test]
fn snapshot_reaches_app() {
    let (mut app, mut bridge, attempt) = connected();

    let _ = deliver(&mut app, &mut bridge, attempt, &snapshot());

    let snapshot = app.snapshot().unwrap();
    assert_eq!(snapshot.current_floor, 1);
    assert_eq!(snapshot.capacity, 8);
    assert_eq!(snapshot.waiting_at(2).map(|w| w.total()), Some(3));
}

#[test]
fn drift_updates_running_config() {
    let (mut app, mut bridge, attempt) = connected();

    let _ = deliver(&mut app, &mut bridge, attempt, &json!({"lowest_floor": -1, "highest_floor": 9}));

    assert_eq!(app.config().min_floor(), -1);
    assert_eq!(app.config().max_floor(), 9);
    assert_eq!(app.editor().values()[1], "9");
}

#[test]
fn call_resets_draft_on_success_only() {
    let (mut app, mut bridge, _) = connected();

    // No destination selected: rejected, draft kept
    let _ = app.adjust_passengers(2);
    let actions = app.call_selected();
    let commands = process_actions(&mut app, &mut bridge, actions);
    assert!(commands.is_empty());
    assert_eq!(app.draft(0).num_passengers, 3);
    assert_eq!(app.status_message(), Some("Error: select a destination floor"));

    let _ = app.cycle_destination(-1);
    let actions = app.call_selected();
    let commands = process_actions(&mut app, &mut bridge, actions);

    assert_eq!(sent_texts(&commands), vec![json!({
        "type": "call",
        "floor": 0,
        "destination": 5,
        "num_passengers": 3
    })]);
    assert_eq!(app.draft(0).num_passengers, 1);
    assert_eq!(app.draft(0).destination, None);
}

#[test]
fn decision_round_trip() {
    let (mut app, mut bridge, attempt) = connected();
    let _ = deliver(&mut app, &mut bridge, attempt, &decision_needed());

    let prompt = app.prompt().unwrap();
    assert_eq!(
        prompt.pending.prompt(),
        "Group of 5 for floor 5 doesn't fit. Space for 3. How many should board?"
    );

    let actions = app.confirm_decision();
    let commands = process_actions(&mut app, &mut bridge, actions);

    assert_eq!(sent_texts(&commands), vec![json!({
        "type": "boarding_decision",
        "floor": 2,
        "direction": "up",
        "destination": 5,
        "num_to_board": 3
    })]);
    assert!(app.prompt().is_none());
}

#[test]
fn out_of_range_answer_keeps_prompt() {
    let (mut app, mut bridge, attempt) = connected();
    let _ = deliver(&mut app, &mut bridge, attempt, &decision_needed());

    let _ = app.decision_input('9');
    let actions = app.confirm_decision();
    let commands = process_actions(&mut app, &mut bridge, actions);

    assert!(commands.is_empty());
    let prompt = app.prompt().unwrap();
    assert!(prompt.error.is_some());
}

#[test]
fn apply_config_while_connected_is_refused() {
    let (mut app, mut bridge, _) = connected();

    let actions = app.apply_config();
    let _ = process_actions(&mut app, &mut bridge, actions);

    assert_eq!(
        app.status_message(),
        Some("Error: configuration changes require reconnecting to the simulation")
    );
}

#[test]
fn invalid_config_is_corrected_while_disconnected() {
    let config = SimulationConfig::default();
    let mut app = App::new(URL.into(), config, Theme::Light);
    let mut bridge = Bridge::new(config);

    let _ = app.set_config_fields(["3".into(), "1".into(), "0".into(), "2.0".into()]);
    let actions = app.apply_config();
    let _ = process_actions(&mut app, &mut bridge, actions);

    assert_eq!(app.editor().values(), &["0", "5", "8", "2.0"].map(String::from));
    assert!(app.status_message().unwrap().starts_with("Invalid configuration"));
    assert_eq!(bridge.client().config(), config);
}

#[test]
fn valid_config_rebuilds_building() {
    let config = SimulationConfig::default();
    let mut app = App::new(URL.into(), config, Theme::Light);
    let mut bridge = Bridge::new(config);

    let _ = app.set_config_fields(["-2".into(), "3".into(), "4".into(), "1.5".into()]);
    let actions = app.apply_config();
    let _ = process_actions(&mut app, &mut bridge, actions);

    assert_eq!(*app.config(), SimulationConfig::new(-2, 3, 4, 1.5));
    assert_eq!(bridge.client().config().start_floor(), -2);
}

#[test]
fn remote_close_restores_editor() {
    let (mut app, mut bridge, attempt) = connected();
    let _ = deliver(&mut app, &mut bridge, attempt, &decision_needed());

    let commands = channel(&mut app, &mut bridge, ChannelEvent::Closed { attempt });

    assert!(commands.is_empty());
    assert!(app.prompt().is_none());
    assert!(app.is_editing_enabled());
    assert_eq!(app.connection_state(), ConnectionState::Closed);
}

#[test]
fn error_event_shows_alert() {
    let (mut app, mut bridge, attempt) = connected();

    let commands = channel(&mut app, &mut bridge, ChannelEvent::Error {
        attempt,
        reason: "reset by peer".into(),
    });

    assert_eq!(commands, vec![ChannelCommand::Abandon { attempt }]);
    assert_eq!(app.connection_state(), ConnectionState::Errored);
    assert!(app.status_message().unwrap().contains("reset by peer"));
}

type Input = Box<dyn FnOnce(&mut App) -> Vec<AppAction> + Send>;

/// One scripted poll.
enum Step {
    /// User input.
    Input(Input),
    /// Server frame arriving on the current channel.
    Server(Value),
}

/// Everything the scripted driver observed.
#[derive(Default)]
struct Record {
    commands: Vec<ChannelCommand>,
    themes: Vec<Theme>,
    renders: usize,
    stopped: bool,
}

/// Driver that plays a script and loops channel commands back as events.
struct ScriptedDriver {
    steps: VecDeque<Step>,
    channel: VecDeque<ChannelEvent>,
    attempt: Option<AttemptId>,
    record: Arc<Mutex<Record>>,
}

impl ScriptedDriver {
    fn new(steps: Vec<Step>) -> (Self, Arc<Mutex<Record>>) {
        let record = Arc::new(Mutex::new(Record::default()));
        let driver = Self {
            steps: steps.into(),
            channel: VecDeque::new(),
            attempt: None,
            record: Arc::clone(&record),
        };
        (driver, record)
    }
}

impl Driver for ScriptedDriver {
    type Error = std::io::Error;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        match self.steps.pop_front() {
            Some(Step::Input(input)) => Ok(input(app)),
            Some(Step::Server(value)) => {
                if let Some(attempt) = self.attempt {
                    self.channel.push_back(ChannelEvent::Message { attempt, text: value.to_string() });
                }
                Ok(vec![])
            },
            None => Ok(app.quit()),
        }
    }

    async fn execute(&mut self, command: ChannelCommand) -> Result<(), Self::Error> {
        match &command {
            ChannelCommand::Open { attempt, .. } => {
                self.attempt = Some(*attempt);
                self.channel.push_back(ChannelEvent::Opened { attempt: *attempt });
            },
            ChannelCommand::Close { attempt } => {
                self.channel.push_back(ChannelEvent::Closed { attempt: *attempt });
            },
            ChannelCommand::Send { .. } | ChannelCommand::Abandon { .. } => {},
        }
        self.record.lock().unwrap().commands.push(command);
        Ok(())
    }

    async fn recv_channel_event(&mut self) -> Option<ChannelEvent> {
        self.channel.pop_front()
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        self.record.lock().unwrap().renders += 1;
        Ok(())
    }

    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error> {
        self.record.lock().unwrap().themes.push(theme);
        Ok(())
    }

    fn stop(&mut self) {
        self.record.lock().unwrap().stopped = true;
    }
}

fn sent_types(record: &Record) -> Vec<String> {
    sent_texts(&record.commands)
        .iter()
        .map(|v| v["type"].as_str().unwrap().to_string())
        .collect()
}

fn run(steps: Vec<Step>, connect_on_start: bool) -> Arc<Mutex<Record>> {
    let (driver, record) = ScriptedDriver::new(steps);
    let runtime = Runtime::new(driver, URL.into(), SimulationConfig::default(), Theme::Light);
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(runtime.run(connect_on_start))
        .unwrap();
    record
}

#[test]
fn runtime_connects_calls_and_closes_on_quit() {
    let record = run(
        vec![
            Step::Server(snapshot()),
            Step::Input(Box::new(|app: &mut App| {
                let mut actions = app.select_floor_up();
                actions.extend(app.cycle_destination(1));
                actions.extend(app.call_selected());
                actions
            })),
        ],
        true,
    );

    let record = record.lock().unwrap();
    assert_eq!(sent_types(&record), vec!["configure", "call"]);
    assert!(matches!(record.commands.last(), Some(ChannelCommand::Close { .. })));
    assert!(record.renders > 0);
    assert!(record.stopped);
}

#[test]
fn runtime_declines_live_decision_on_quit() {
    let record = run(vec![Step::Server(decision_needed())], true);

    let record = record.lock().unwrap();
    assert_eq!(sent_types(&record), vec!["configure", "boarding_decision"]);
    let decline = sent_texts(&record.commands).pop().unwrap();
    assert_eq!(decline["num_to_board"], 0);
}

#[test]
fn runtime_answers_decision_exactly_once() {
    let record = run(
        vec![
            Step::Server(decision_needed()),
            Step::Input(Box::new(|app: &mut App| {
                let mut actions = app.decision_backspace();
                actions.extend(app.decision_input('2'));
                actions.extend(app.confirm_decision());
                actions
            })),
        ],
        true,
    );

    let record = record.lock().unwrap();
    assert_eq!(sent_types(&record), vec!["configure", "boarding_decision"]);
    let answer = sent_texts(&record.commands).pop().unwrap();
    assert_eq!(answer["num_to_board"], 2);
}

#[test]
fn runtime_persists_theme_without_connecting() {
    let record = run(vec![Step::Input(Box::new(|app: &mut App| app.toggle_theme()))], false);

    let record = record.lock().unwrap();
    assert_eq!(record.themes, vec![Theme::Dark]);
    assert!(record.commands.is_empty());
}
