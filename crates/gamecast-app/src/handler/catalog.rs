//! Catalog handlers

use gamecast_core::{sort_games, Error, Game};
use tracing::{debug, warn};

use crate::message::Message;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_fetch(state: &mut AppState) -> UpdateResult {
    if state.catalog.loading {
        debug!("Catalog fetch already in flight");
        return UpdateResult::none();
    }
    state.catalog.loading = true;
    UpdateResult::action(UpdateAction::FetchCatalog)
}

pub fn handle_loaded(state: &mut AppState, games: Vec<Game>) -> UpdateResult {
    debug!("Catalog loaded with {} games", games.len());
    state.catalog.loading = false;
    state.catalog.error = None;
    state.catalog.offline = false;
    state.catalog.generation += 1;
    state.catalog.replace(games);
    if state.notice.as_deref().is_some_and(|n| n.starts_with(OFFLINE_NOTICE)) {
        state.notice = None;
    }
    UpdateResult::none()
}

const OFFLINE_NOTICE: &str = "Offline catalog";

/// A failed fetch substitutes the configured fallback games, if any.
///
/// Without a fallback the current list is kept and the error is shown.
pub fn handle_failed(state: &mut AppState, error: Error) -> UpdateResult {
    warn!("Catalog fetch failed: {}", error);
    state.catalog.loading = false;
    state.catalog.generation += 1;
    state.catalog.error = Some(error.to_string());

    let fallback = &state.settings.catalog.fallback;
    if !fallback.is_empty() {
        let mut games = fallback.clone();
        sort_games(&mut games);
        state.catalog.replace(games);
        state.catalog.offline = true;
        state.notice = Some(format!("{OFFLINE_NOTICE}: {error}"));
    }

    UpdateResult::none()
}

pub fn handle_play_selected(state: &mut AppState) -> UpdateResult {
    match state.catalog.selected_game() {
        Some(game) => UpdateResult::message(Message::StartSession {
            game: game.id(),
            regions: None,
        }),
        None => UpdateResult::none(),
    }
}
