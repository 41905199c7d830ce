//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.
//!
//! ```text
//! +------------------------------+---------------+
//! | building (one row per floor) | configuration |
//! |                              | elevator      |
//! +------------------------------+---------------+
//! | decision prompt / command line / key help    |
//! +----------------------------------------------+
//! | status bar                                   |
//! +----------------------------------------------+
//! ```

mod building;
mod input;
mod panel;
mod palette;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

pub use building::floor_row;
pub use palette::Palette;

use crate::{App, InputState};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 4;
    const STATUS_HEIGHT: u16 = 1;

    let palette = Palette::for_theme(app.theme());
    frame.render_widget(ratatui::widgets::Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, input, &palette, *main_area);
    input::render(frame, app, input, &palette, *input_area);
    status::render(frame, app, &palette, *status_area);
}

/// Render the main area (building + side panel).
fn render_main_area(frame: &mut Frame, app: &App, input: &InputState, palette: &Palette, area: Rect) {
    const BUILDING_MIN_WIDTH: u16 = 40;
    const PANEL_WIDTH: u16 = 34;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(BUILDING_MIN_WIDTH), Constraint::Length(PANEL_WIDTH)])
        .split(area);

    let [building_area, panel_area] = chunks.as_ref() else {
        return;
    };

    building::render(frame, app, palette, *building_area);
    panel::render(frame, app, input, palette, *panel_area);
}
