//! Header bar widget
//!
//! App title, the current context (catalog or game) and key hints for the
//! current screen.

use gamecast_app::{AppState, UiMode};
use gamecast_core::SessionStatus;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{icons, palette, styles};

/// Main header showing app title, context and key hints
pub struct MainHeader<'a> {
    state: &'a AppState,
}

impl<'a> MainHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn status_dot(&self) -> (&'static str, Style) {
        match &self.state.session {
            Some(session) => {
                let (icon, _, style) = styles::status_indicator(session.status, self.state.ticks);
                (icon, style)
            }
            None => {
                let (icon, _, style) = styles::status_indicator_idle();
                (icon, style)
            }
        }
    }

    fn context(&self) -> &str {
        match (&self.state.session, self.state.ui_mode) {
            (Some(session), UiMode::Session | UiMode::ConfirmExit) => session.game_name.as_str(),
            _ => "Catalog",
        }
    }
}

/// Key hints for the current screen as `(key, label)` pairs
pub fn shortcuts(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match state.ui_mode {
        UiMode::Catalog => vec![
            ("↑↓", "Select"),
            ("Enter", "Play"),
            ("R", "Refresh"),
            ("q", "Quit"),
        ],
        UiMode::ConfirmExit => vec![("y", "Leave"), ("n", "Stay")],
        UiMode::Session => match state.session_status() {
            Some(SessionStatus::Error) => vec![("r", "Retry"), ("Esc", "Back"), ("q", "Quit")],
            Some(SessionStatus::Ending) => vec![("q", "Quit")],
            Some(SessionStatus::Active) => vec![("Esc", "Leave game"), ("q", "Quit")],
            _ => vec![("Esc", "Cancel"), ("q", "Quit")],
        },
    }
}

fn shortcut_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        let sep = if i + 1 < hints.len() { "  " } else { "" };
        spans.push(Span::styled("[", styles::text_muted()));
        spans.push(Span::styled(*key, styles::key_hint()));
        spans.push(Span::styled(format!("] {label}{sep}"), styles::text_muted()));
    }
    Line::from(spans)
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (dot, dot_style) = self.status_dot();
        let mut left_spans = vec![
            Span::raw(" "),
            Span::styled(dot, dot_style),
            Span::raw(" "),
            Span::styled("gamecast", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.context().to_string(), styles::text_secondary()),
        ];
        if self.state.catalog.offline && self.state.ui_mode == UiMode::Catalog {
            left_spans.push(Span::raw("  "));
            left_spans.push(Span::styled(
                format!("{} offline", icons::OFFLINE),
                styles::status_yellow(),
            ));
        }
        let left_line = Line::from(left_spans);
        let left_width = left_line.width() as u16;
        buf.set_line(inner.x, inner.y, &left_line, inner.width);

        // Hints are right-aligned and dropped when they would overlap the title
        let hints = shortcut_line(&shortcuts(self.state));
        let hints_width = hints.width() as u16;
        if left_width + hints_width + 2 <= inner.width {
            let hints_x = inner.x + inner.width - hints_width - 1;
            buf.set_line(hints_x, inner.y, &hints, hints_width);
        }
    }
}
