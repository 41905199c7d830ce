//! Colours for the light and dark themes.

use elevator_app::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Normal text.
    pub fg: Color,
    /// Background.
    pub bg: Color,
    /// Car position and highlights.
    pub accent: Color,
    /// Hints and placeholders.
    pub muted: Color,
    /// Healthy connection.
    pub ok: Color,
    /// In-flight connection.
    pub pending: Color,
    /// Failed or closed connection.
    pub error: Color,
}

impl Palette {
    /// Colours for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::DarkGray,
                ok: Color::Green,
                pending: Color::Yellow,
                error: Color::Red,
            },
            Theme::Dark => Self {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                ok: Color::LightGreen,
                pending: Color::LightYellow,
                error: Color::LightRed,
            },
        }
    }

    /// Default text style.
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Highlighted text.
    pub fn accent(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Secondary text.
    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    /// Cursor row.
    pub fn selected(&self) -> Style {
        self.base().add_modifier(Modifier::REVERSED)
    }
}
