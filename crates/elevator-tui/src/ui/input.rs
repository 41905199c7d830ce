//! Input area: decision prompt, command line or key help.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Palette;
use crate::{App, InputMode, InputState};

/// Render the input area.
pub fn render(frame: &mut Frame, app: &App, input: &InputState, palette: &Palette, area: Rect) {
    let block = Block::default().borders(Borders::ALL).style(palette.base());

    // A pending decision takes over the input area until it is answered
    if let Some(prompt) = app.prompt() {
        let mut answer = vec![Span::styled(format!("> {}", prompt.input), palette.accent())];
        if let Some(error) = &prompt.error {
            answer.push(Span::styled(format!("  {error}"), palette.base().fg(palette.error)));
        }
        let lines = vec![Line::from(prompt.pending.prompt()), Line::from(answer)];
        frame.render_widget(Paragraph::new(lines).block(block.title(" Boarding ")), area);
        return;
    }

    match input.mode() {
        InputMode::Command => {
            let line = Line::from(format!("/{}", input.buffer()));
            frame.render_widget(Paragraph::new(line).block(block.title(" Command ")), area);

            let typed = input.buffer()[..input.cursor()].chars().count();
            let offset = u16::try_from(typed + 1).unwrap_or(u16::MAX);
            frame.set_cursor_position((area.x.saturating_add(1).saturating_add(offset), area.y + 1));
        },
        InputMode::Editor => {
            let help = "Type a value  Tab next field  Enter apply  Esc back";
            let line = Line::from(Span::styled(help, palette.muted()));
            frame.render_widget(Paragraph::new(line).block(block), area);
        },
        InputMode::Navigate => {
            let lines = vec![
                Line::from(Span::styled(
                    "↑↓ floor  ←→ destination  +/- passengers  Enter call",
                    palette.muted(),
                )),
                Line::from(Span::styled(
                    "c connect  Tab configure  t theme  / command  q quit",
                    palette.muted(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), area);
        },
    }
}
