//! Main render/view function (View in TEA pattern)


use gamecast_app::state::{AppState, UiMode};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI (View function in TEA)
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);
    frame.render_widget(widgets::MainHeader::new(state), areas.header);

    // The catalog stays on screen until the session screen is entered
    match state.session_view() {
        Some(session) if state.ui_mode != UiMode::Catalog => {
            frame.render_widget(
                widgets::SessionPanel::new(&session).ticks(state.ticks),
                areas.body,
            );
        }
        _ => {
            frame.render_widget(
                widgets::CatalogList::new(&state.catalog).ticks(state.ticks),
                areas.body,
            );
        }
    }

    if layout::use_compact_status(area) {
        frame.render_widget(widgets::StatusBarCompact::new(state), areas.status);
    } else {
        frame.render_widget(widgets::StatusBar::new(state), areas.status);
    }

    if state.ui_mode == UiMode::ConfirmExit {
        let game = state
            .session
            .as_ref()
            .map(|s| s.game_name.as_str())
            .unwrap_or_default();
        frame.render_widget(widgets::ConfirmExitDialog::new(game), area);
    }
}
