//! Status bar.

use elevator_app::ConnectionState;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Palette;
use crate::App;

fn connection_label(state: ConnectionState, palette: &Palette) -> (&'static str, Style) {
    let base = palette.base();
    match state {
        ConnectionState::Open => ("Connected", base.fg(palette.ok)),
        ConnectionState::Connecting => ("Connecting", base.fg(palette.pending)),
        ConnectionState::Closing => ("Closing", base.fg(palette.pending)),
        ConnectionState::Errored => ("Connection failed", base.fg(palette.error)),
        ConnectionState::Idle | ConnectionState::Closed => ("Disconnected", base.fg(palette.muted)),
    }
}

/// Render the status bar: connection state, endpoint and the last message.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (label, style) = connection_label(app.connection_state(), palette);

    let mut spans = vec![
        Span::styled(format!(" ● {label} "), style),
        Span::styled(app.endpoint().to_string(), palette.muted()),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(format!("  {message}"), palette.base()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.base()), area);
}
