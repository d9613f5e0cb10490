//! Abstract input key event, independent of terminal library.
//!
//! Remote controls, keyboards and the headless command reader all end up as
//! an [`InputKey`], so the application core never depends on crossterm.

/// Abstract input key event.
/// Converted from crossterm::event::KeyEvent at the TUI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key
    Char(char),
    /// Character with Ctrl modifier (Ctrl+c, ...)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    /// OK / select
    Enter,
    /// Back
    Esc,
    /// Back on keyboards without a remote
    Backspace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_equality() {
        assert_eq!(InputKey::Char('r'), InputKey::Char('r'));
        assert_ne!(InputKey::Char('r'), InputKey::Char('R'));
        assert_ne!(InputKey::CharCtrl('c'), InputKey::Char('c'));
    }
}
