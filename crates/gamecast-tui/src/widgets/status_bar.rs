//! Status bar widget
//!
//! Session state, region and poll progress on the left; the current notice
//! on the right.

use gamecast_app::AppState;
use gamecast_core::SessionStatus;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{palette, styles};

/// Status bar widget showing application state
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn state_indicator(&self) -> Span<'static> {
        let (icon, label, style) = match &self.state.session {
            Some(session) => styles::status_indicator(session.status, self.state.ticks),
            None => styles::status_indicator_idle(),
        };
        Span::styled(format!("{icon} {label}"), style)
    }

    fn details(&self) -> Vec<Span<'static>> {
        let Some(session) = &self.state.session else {
            let count = self.state.catalog.games.len();
            return vec![Span::styled(
                format!("{count} game{}", if count == 1 { "" } else { "s" }),
                styles::text_muted(),
            )];
        };

        let mut spans = Vec::new();
        if !session.region.is_empty() {
            spans.push(Span::styled(session.region.clone(), styles::accent()));
        }
        if session.status == SessionStatus::WaitingForSession && session.poll_count > 0 {
            spans.push(Span::styled(
                format!(
                    "check {}/{}",
                    session.poll_count,
                    self.state.settings.session.poll_policy().max_attempts
                ),
                styles::text_secondary(),
            ));
        }
        spans
    }

    /// Notice, or the catalog error when nothing else explains it
    fn notice(&self) -> Option<Span<'static>> {
        if let Some(notice) = &self.state.notice {
            return Some(Span::styled(notice.clone(), styles::status_yellow()));
        }
        match (&self.state.catalog.error, self.state.catalog.games.is_empty()) {
            (Some(error), false) => Some(Span::styled(
                format!("Catalog refresh failed: {error}"),
                styles::status_red(),
            )),
            _ => None,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::CARD_BG));

        let mut spans = vec![Span::raw(" "), self.state_indicator()];
        for detail in self.details() {
            spans.push(Span::styled(" │ ", styles::text_muted()));
            spans.push(detail);
        }
        let left = Line::from(spans);
        let left_width = left.width() as u16;
        buf.set_line(area.x, area.y, &left, area.width);

        if let Some(notice) = self.notice() {
            let notice = Line::from(vec![notice, Span::raw(" ")]);
            let available = area.width.saturating_sub(left_width + 2);
            let width = (notice.width() as u16).min(available);
            if width > 0 {
                let x = area.x + area.width - width;
                buf.set_line(x, area.y, &notice, width);
            }
        }
    }
}

/// Compact status bar for narrow terminals: indicator only
pub struct StatusBarCompact<'a> {
    state: &'a AppState,
}

impl<'a> StatusBarCompact<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for StatusBarCompact<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::CARD_BG));
        let line = Line::from(vec![
            Span::raw(" "),
            StatusBar::new(self.state).state_indicator(),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
