//! Semantic style builders.

use gamecast_core::SessionStatus;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::{icons, palette};

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn title() -> Style {
    Style::default()
        .fg(palette::TEXT_BRIGHT)
        .add_modifier(Modifier::BOLD)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_row() -> Style {
    Style::default()
        .fg(palette::SELECTED_FG)
        .bg(palette::SELECTED_BG)
        .add_modifier(Modifier::BOLD)
}

// --- Status styles ---
pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// Key hint, e.g. the `r` in `[r] Retry`
pub fn key_hint() -> Style {
    Style::default()
        .fg(palette::STATUS_YELLOW)
        .add_modifier(Modifier::BOLD)
}

// --- Blocks ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- Session status indicator ---

/// Icon, label and style for a session status.
///
/// `ticks` animates the spinner of the loading states.
pub fn status_indicator(status: SessionStatus, ticks: u64) -> (&'static str, &'static str, Style) {
    match status {
        SessionStatus::Initializing
        | SessionStatus::CreatingSession
        | SessionStatus::WaitingForSession => (
            icons::spinner_frame(ticks),
            status.label(),
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        SessionStatus::Active => (
            icons::PLAYING,
            status.label(),
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        SessionStatus::Ending => (
            icons::spinner_frame(ticks),
            status.label(),
            Style::default().fg(palette::TEXT_SECONDARY),
        ),
        SessionStatus::Error => (
            icons::ERROR,
            status.label(),
            Style::default()
                .fg(palette::STATUS_RED)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Indicator shown when no session exists
pub fn status_indicator_idle() -> (&'static str, &'static str, Style) {
    (icons::IDLE, "Browsing", Style::default().fg(palette::TEXT_MUTED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_indicator_labels() {
        let (_, label, _) = status_indicator(SessionStatus::WaitingForSession, 0);
        assert_eq!(label, "Waiting for session");

        let (icon, label, style) = status_indicator(SessionStatus::Error, 0);
        assert_eq!(icon, icons::ERROR);
        assert_eq!(label, "Error");
        assert_eq!(style.fg, Some(palette::STATUS_RED));
    }

    #[test]
    fn test_loading_states_spin() {
        let (first, _, _) = status_indicator(SessionStatus::CreatingSession, 0);
        let (later, _, _) = status_indicator(SessionStatus::CreatingSession, 4);
        assert_ne!(first, later);
    }

    #[test]
    fn test_active_indicator_is_green() {
        let (icon, _, style) = status_indicator(SessionStatus::Active, 7);
        assert_eq!(icon, icons::PLAYING);
        assert_eq!(style.fg, Some(palette::STATUS_GREEN));
    }
}
