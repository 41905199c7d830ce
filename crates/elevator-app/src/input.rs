//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries so key handling can
/// be driven from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (call, confirm, run command).
    Enter,
    /// Backspace key.
    Backspace,
    /// Tab key (next config field).
    Tab,
    /// Escape key (cancel prompt, clear command, quit).
    Esc,
    /// Left arrow key (previous destination).
    Left,
    /// Right arrow key (next destination).
    Right,
    /// Up arrow key (floor above).
    Up,
    /// Down arrow key (floor below).
    Down,
}
