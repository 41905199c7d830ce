//! Building view
//!
//! One row per floor, highest first: cursor, floor label, car, waiting
//! groups and the row's call draft.

use elevator_proto::{BoardDirection, display_floor};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Palette;
use crate::App;

/// Text of one floor row.
///
/// ```text
/// >   G [2/8]   3▲5 1▼G (4)        → 4 ×2
/// ```
pub fn floor_row(app: &App, floor: i32) -> String {
    let marker = if app.selected_floor() == floor { ">" } else { " " };
    let label = display_floor(floor);

    let snapshot = app.snapshot();
    let car = snapshot
        .filter(|s| s.current_floor == floor)
        .map(|s| format!("[{}/{}]", s.current_load, s.capacity))
        .unwrap_or_default();

    let waiting = snapshot
        .and_then(|s| s.waiting_at(floor))
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut groups = w.summary(BoardDirection::Up);
            groups.extend(w.summary(BoardDirection::Down));
            format!("{} ({})", groups.join(" "), w.total())
        })
        .unwrap_or_default();

    let draft = app.draft(floor);
    let destination = draft.destination.map_or_else(|| "--".to_string(), display_floor);

    let row = format!(
        "{marker} {label:>3} {car:<7} {waiting:<18} → {destination} ×{}",
        draft.num_passengers
    );
    row.trim_end().to_string()
}

/// Render the building.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let config = app.config();
    let lines: Vec<Line> = config
        .floors()
        .rev()
        .map(|floor| {
            let text = floor_row(app, floor);
            let car_here = app.snapshot().is_some_and(|s| s.current_floor == floor);
            let style = if app.selected_floor() == floor {
                palette.selected()
            } else if car_here {
                palette.accent()
            } else {
                palette.base()
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Building ").style(palette.base());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use elevator_app::{AppEvent, Theme};
    use elevator_client::{ElevatorSnapshot, SimulationConfig, WaitingGroup, WaitingQueues};

    use super::*;

    fn app_with_snapshot() -> App {
        let mut app = App::new("ws://localhost:5050/ws".into(), SimulationConfig::default(), Theme::Light);
        let mut snapshot = ElevatorSnapshot { current_floor: 2, current_load: 2, capacity: 8, ..Default::default() };
        snapshot.waiting_by_floor.insert(2, WaitingQueues {
            up: vec![WaitingGroup { destination: 5, count: 3 }],
            down: vec![WaitingGroup { destination: 0, count: 1 }],
        });
        let _ = app.handle(AppEvent::SnapshotUpdated(snapshot));
        app
    }

    #[test]
    fn empty_row_shows_default_draft() {
        let app = app_with_snapshot();

        assert_eq!(floor_row(&app, 0), ">   G                            → -- ×1");
    }

    #[test]
    fn car_and_waiting_groups() {
        let app = app_with_snapshot();

        assert_eq!(floor_row(&app, 2), "    2 [2/8]   3▲5 1▼G (4)        → -- ×1");
    }

    #[test]
    fn draft_shows_selection() {
        let mut app = app_with_snapshot();
        let _ = app.cycle_destination(-1);
        let _ = app.adjust_passengers(1);

        assert_eq!(floor_row(&app, 0), ">   G                            → 5 ×2");
    }
}
