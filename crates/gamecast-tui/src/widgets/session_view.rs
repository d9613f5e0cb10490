//! Session screen: loading, error, active and ending views

use gamecast_app::SessionView;
use gamecast_core::SessionStatus;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::{icons, palette, styles};

pub struct SessionPanel<'a> {
    view: &'a SessionView,
    ticks: u64,
}

impl<'a> SessionPanel<'a> {
    pub fn new(view: &'a SessionView) -> Self {
        Self { view, ticks: 0 }
    }

    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match self.view.status {
            SessionStatus::Initializing
            | SessionStatus::CreatingSession
            | SessionStatus::WaitingForSession => self.loading_lines(),
            SessionStatus::Active => self.active_lines(),
            SessionStatus::Ending => vec![spinner_line(self.ticks, "Ending session…".into())],
            SessionStatus::Error => self.error_lines(),
        }
    }

    fn loading_lines(&self) -> Vec<Line<'static>> {
        let message = self
            .view
            .status_message
            .clone()
            .unwrap_or_else(|| format!("{}…", self.view.status.label()));

        let mut lines = vec![
            Line::styled(self.view.game_name.clone(), styles::accent_bold()),
            Line::default(),
            spinner_line(self.ticks, message),
        ];
        if !self.view.region.is_empty() {
            lines.push(Line::styled(
                format!("Region: {}", self.view.region),
                styles::text_muted(),
            ));
        }
        lines.push(Line::default());
        lines.push(hint_line(&[("Esc", "Cancel")]));
        lines
    }

    fn active_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::styled(
                format!("{} Playing {}", icons::PLAYING, self.view.game_name),
                styles::status_green(),
            ),
            Line::default(),
        ];
        if !self.view.region.is_empty() {
            lines.push(Line::styled(
                format!("Streaming from {}", self.view.region),
                styles::text_secondary(),
            ));
        }
        if let Some(message) = &self.view.status_message {
            lines.push(Line::styled(message.clone(), styles::text_muted()));
        }
        lines.push(Line::default());
        lines.push(hint_line(&[("Esc", "Leave game")]));
        lines
    }

    fn error_lines(&self) -> Vec<Line<'static>> {
        let reason = self
            .view
            .error_text
            .clone()
            .unwrap_or_else(|| "Something went wrong".to_string());
        vec![
            Line::styled(
                format!("{} Couldn't start {}", icons::ERROR, self.view.game_name),
                styles::status_red(),
            ),
            Line::default(),
            Line::styled(reason, styles::text_primary()),
            Line::default(),
            hint_line(&[("r", "Retry"), ("Esc", "Back")]),
        ]
    }
}

fn spinner_line(ticks: u64, message: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(icons::spinner_frame(ticks), styles::accent_bold()),
        Span::raw(" "),
        Span::styled(message, styles::text_secondary()),
    ])
}

fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in hints {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("[", styles::text_muted()));
        spans.push(Span::styled(*key, styles::key_hint()));
        spans.push(Span::styled(format!("] {label}"), styles::text_muted()));
    }
    Line::from(spans)
}

impl Widget for SessionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let focused = self.view.status != SessionStatus::Ending;
        let block = styles::glass_block(focused)
            .title(format!(" {} ", self.view.game_name))
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = self.lines();
        let top = inner.height.saturating_sub(lines.len() as u16) / 2;
        let content = Rect {
            y: inner.y + top,
            height: inner.height - top,
            ..inner
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content, buf);
    }
}
