//! Catalog list widget
//!
//! Scrollable game list with the selected entry highlighted and its
//! description underneath.

use gamecast_app::CatalogState;
use gamecast_core::Game;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{icons, palette, styles};

/// Rows reserved for the description of the selected game
const DETAILS_HEIGHT: u16 = 3;

pub struct CatalogList<'a> {
    catalog: &'a CatalogState,
    ticks: u64,
}

impl<'a> CatalogList<'a> {
    pub fn new(catalog: &'a CatalogState) -> Self {
        Self { catalog, ticks: 0 }
    }

    /// Animate the loading spinner
    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    fn title(&self) -> String {
        if self.catalog.loading && !self.catalog.games.is_empty() {
            " Games (refreshing) ".to_string()
        } else {
            format!(" Games ({}) ", self.catalog.games.len())
        }
    }

    fn render_placeholder(&self, area: Rect, buf: &mut Buffer) {
        let lines = if self.catalog.loading {
            vec![Line::from(vec![
                Span::styled(icons::spinner_frame(self.ticks), styles::accent_bold()),
                Span::styled(" Loading catalog…", styles::text_secondary()),
            ])]
        } else if let Some(error) = &self.catalog.error {
            vec![
                Line::styled("Couldn't load the catalog", styles::status_red()),
                Line::styled(error.clone(), styles::text_secondary()),
                Line::default(),
                Line::from(vec![
                    Span::styled("[", styles::text_muted()),
                    Span::styled("R", styles::key_hint()),
                    Span::styled("] Try again", styles::text_muted()),
                ]),
            ]
        } else {
            vec![Line::styled("No games available", styles::text_muted())]
        };

        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let inner = Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let visible = area.height as usize;
        if visible == 0 {
            return;
        }
        let offset = scroll_offset(self.catalog.selected, visible);

        for (row, (index, game)) in self
            .catalog
            .games
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let y = area.y + row as u16;
            let selected = index == self.catalog.selected;
            let line = game_row(game, selected, area.width as usize);
            if selected {
                buf.set_style(Rect::new(area.x, y, area.width, 1), styles::selected_row());
            }
            buf.set_line(area.x, y, &line, area.width);
        }
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let Some(game) = self.catalog.selected_game() else {
            return;
        };
        let text = game
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description");
        Paragraph::new(text)
            .style(styles::text_secondary())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// First visible row so that `selected` stays on screen
fn scroll_offset(selected: usize, visible: usize) -> usize {
    selected.saturating_sub(visible.saturating_sub(1))
}

fn game_row(game: &Game, selected: bool, width: usize) -> Line<'static> {
    let marker = if selected { icons::SELECTED } else { " " };
    let (name_style, meta_style) = if selected {
        (styles::selected_row(), styles::selected_row())
    } else {
        (styles::text_primary(), styles::text_muted())
    };

    let meta = game.input_devices.join(", ");
    let meta_width = meta.width();
    // " ❯ " prefix, and a gap before the right-aligned input devices
    let name_budget = width
        .saturating_sub(3)
        .saturating_sub(if meta.is_empty() { 0 } else { meta_width + 2 });
    let name = truncate_to_width(&game.name, name_budget);
    let padding = width.saturating_sub(3 + name.width() + meta_width);

    let mut spans = vec![
        Span::styled(format!(" {marker} "), name_style),
        Span::styled(name, name_style),
    ];
    if !meta.is_empty() && padding >= 2 {
        spans.push(Span::styled(" ".repeat(padding), name_style));
        spans.push(Span::styled(meta, meta_style));
    }
    Line::from(spans)
}

/// Cut `text` to at most `max` terminal columns, ending in `…` when cut
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Widget for CatalogList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(true)
            .title(self.title())
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.catalog.games.is_empty() {
            self.render_placeholder(inner, buf);
            return;
        }

        if inner.height > DETAILS_HEIGHT + 2 {
            let [list, _, details] = Layout::vertical([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(DETAILS_HEIGHT),
            ])
            .areas(inner);
            self.render_rows(list, buf);
            self.render_details(details, buf);
        } else {
            self.render_rows(inner, buf);
        }
    }
}
