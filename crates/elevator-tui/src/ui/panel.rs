//! Side panel: configuration above, elevator state below.

use elevator_app::CONFIG_FIELDS;
use elevator_client::{ConfigField, ElevatorSnapshot};
use elevator_proto::display_floor;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Palette;
use crate::{App, InputMode, InputState};

/// Render the side panel.
pub fn render(frame: &mut Frame, app: &App, input: &InputState, palette: &Palette, area: Rect) {
    const CONFIG_HEIGHT: u16 = 6;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CONFIG_HEIGHT), Constraint::Min(0)])
        .split(area);

    let [config_area, elevator_area] = chunks.as_ref() else {
        return;
    };

    if app.is_editing_enabled() {
        render_editor(frame, app, input, palette, *config_area);
    } else {
        render_running_config(frame, app, palette, *config_area);
    }
    render_elevator(frame, app, palette, *elevator_area);
}

fn field_label(field: ConfigField) -> &'static str {
    match field {
        ConfigField::MinFloor => "Min floor",
        ConfigField::MaxFloor => "Max floor",
        ConfigField::Capacity => "Capacity",
        ConfigField::CycleTime => "Cycle (s)",
    }
}

fn render_editor(frame: &mut Frame, app: &App, input: &InputState, palette: &Palette, area: Rect) {
    let editor = app.editor();
    let editing = input.mode() == InputMode::Editor;

    let lines: Vec<Line> = CONFIG_FIELDS
        .iter()
        .zip(editor.values())
        .enumerate()
        .map(|(idx, (field, value))| {
            let focused = editing && idx == editor.focus();
            let marker = if focused { ">" } else { " " };
            let text = format!("{marker} {:<10} {value}", field_label(*field));
            let style = if focused { palette.accent() } else { palette.base() };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let title = if editing { " Configuration (Enter applies) " } else { " Configuration " };
    let block = Block::default().borders(Borders::ALL).title(title).style(palette.base());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_running_config(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let config = app.config();
    let lines = vec![
        Line::from(format!(
            "{:<10} {}..{}",
            "Floors",
            display_floor(config.min_floor()),
            display_floor(config.max_floor())
        )),
        Line::from(format!("{:<10} {}", "Capacity", config.capacity())),
        Line::from(format!("{:<10} {:.1} s", "Cycle", config.cycle_time())),
    ];

    let block =
        Block::default().borders(Borders::ALL).title(" Running configuration ").style(palette.base());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Elevator status text, one entry per line.
fn elevator_lines(snapshot: &ElevatorSnapshot) -> Vec<String> {
    let stops = if snapshot.stops_display.is_empty() {
        "None".to_string()
    } else {
        snapshot.stops_display.join(", ")
    };

    vec![
        format!("{:<10} {}", "Floor", display_floor(snapshot.current_floor)),
        format!("{:<10} {}", "Direction", snapshot.direction.label()),
        format!("{:<10} {}/{}", "Load", snapshot.current_load, snapshot.capacity),
        format!("{:<10} {}", "Riders", snapshot.destinations_display),
        format!("{:<10} {stops}", "Stops"),
    ]
}

fn render_elevator(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let lines: Vec<Line> = match app.snapshot() {
        Some(snapshot) => elevator_lines(snapshot).into_iter().map(Line::from).collect(),
        None => vec![Line::from(Span::styled("Waiting for state...", palette.muted()))],
    };

    let block = Block::default().borders(Borders::ALL).title(" Elevator ").style(palette.base());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use elevator_proto::Motion;

    use super::*;

    #[test]
    fn elevator_status_lines() {
        let snapshot = ElevatorSnapshot {
            current_floor: 0,
            direction: Motion::Up,
            current_load: 2,
            capacity: 8,
            destinations_display: "3, 5".into(),
            stops_display: vec!["3".into(), "5".into()],
            ..Default::default()
        };

        insta::assert_snapshot!(elevator_lines(&snapshot).join("\n"), @r"
        Floor      G
        Direction  ▲ Up
        Load       2/8
        Riders     3, 5
        Stops      3, 5
        ");
    }

    #[test]
    fn no_stops_reads_none() {
        let snapshot = ElevatorSnapshot::default();

        assert_eq!(elevator_lines(&snapshot).last().map(String::as_str), Some("Stops      None"));
    }
}
