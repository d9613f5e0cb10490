//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in:
//! - `catalog`: catalog fetch results and selection
//! - `session_lifecycle`: the session state machine
//! - `bridge_events`: streaming SDK push events

use crate::message::Message;
use crate::state::AppState;

use super::{bridge_events, catalog, keys::handle_key, session_lifecycle, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => {
            if state.session_status().is_some_and(|s| s.is_loading()) {
                state.ticks = state.ticks.wrapping_add(1);
            }
            UpdateResult::none()
        }

        // Live sessions are torn down by Engine::shutdown
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Catalog
        // ─────────────────────────────────────────────────────────
        Message::FetchCatalog => catalog::handle_fetch(state),
        Message::CatalogLoaded { games } => catalog::handle_loaded(state, games),
        Message::CatalogFailed { error } => catalog::handle_failed(state, error),
        Message::SelectNext => {
            state.catalog.select_next();
            UpdateResult::none()
        }
        Message::SelectPrevious => {
            state.catalog.select_previous();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Shell Intents
        // ─────────────────────────────────────────────────────────
        Message::PlaySelected => catalog::handle_play_selected(state),
        Message::StartSession { game, regions } => {
            session_lifecycle::handle_start(state, game, regions)
        }
        Message::Retry => session_lifecycle::handle_retry(state),
        Message::ExitRequested { skip_confirmation } => {
            session_lifecycle::handle_exit_requested(state, skip_confirmation)
        }
        Message::ConfirmExit => session_lifecycle::handle_confirm_exit(state),
        Message::CancelExit => session_lifecycle::handle_cancel_exit(state),

        // ─────────────────────────────────────────────────────────
        // Session Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::BridgeConnected { attempt, bridge } => {
            session_lifecycle::handle_bridge_connected(state, attempt, bridge)
        }
        Message::BridgeConnectFailed { attempt, error } => {
            session_lifecycle::handle_attempt_failed(state, attempt, error)
        }
        Message::LocalSignalGenerated { attempt, signal } => {
            if let Some(session) = state.session_for(attempt) {
                session.local_signal = Some(signal);
            }
            UpdateResult::none()
        }
        Message::SessionCreated {
            attempt,
            group_id,
            response,
        } => session_lifecycle::handle_session_created(state, attempt, group_id, response),
        Message::SessionCreateFailed { attempt, error } => {
            session_lifecycle::handle_attempt_failed(state, attempt, error)
        }
        Message::PollProgress {
            attempt,
            poll,
            response,
        } => session_lifecycle::handle_poll_progress(state, attempt, poll, response),
        Message::SessionReady {
            attempt,
            region,
            remote_signal,
        } => session_lifecycle::handle_session_ready(state, attempt, region, remote_signal),
        Message::PollFailed { attempt, error } => {
            session_lifecycle::handle_attempt_failed(state, attempt, error)
        }
        Message::RemoteSignalApplied { attempt, signal } => {
            session_lifecycle::handle_remote_signal_applied(state, attempt, signal)
        }
        Message::RemoteSignalRejected { attempt, error } => {
            session_lifecycle::handle_attempt_failed(state, attempt, error)
        }
        Message::SessionUpdated {
            attempt,
            remote_signal,
        } => session_lifecycle::handle_session_updated(state, attempt, remote_signal),
        Message::SessionUpdateFailed { attempt, error } => {
            session_lifecycle::handle_attempt_failed(state, attempt, error)
        }
        Message::SessionTornDown { attempt } => {
            session_lifecycle::handle_torn_down(state, attempt)
        }

        Message::Bridge { attempt, event } => bridge_events::handle_event(state, attempt, event),
    }
}
