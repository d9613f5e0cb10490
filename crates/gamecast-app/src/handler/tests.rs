//! Tests for handler module

use std::sync::Arc;

use gamecast_backend::test_utils::{status_response, test_game, FakeSdk};
use gamecast_backend::{CreateSessionResponse, SignalingBridge};
use gamecast_core::{
    AttemptId, BridgeEvent, ConnectionState, Error, FailureKind, GameId, SessionStatus,
};

use super::*;
use crate::handler::keys::handle_key;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppPhase, AppState, UiMode};

fn racer() -> GameId {
    GameId::new("a", "sg-a")
}

fn catalog_state() -> AppState {
    let mut state = AppState::new();
    state
        .catalog
        .replace(vec![test_game("a", "Racer", 1), test_game("b", "Puzzler", 2)]);
    state
}

fn bridge() -> Arc<SignalingBridge> {
    Arc::new(SignalingBridge::new(Arc::new(FakeSdk::ready("offer"))))
}

fn created(arn: &str) -> CreateSessionResponse {
    CreateSessionResponse {
        arn: arn.to_string(),
        ..Default::default()
    }
}

/// Start a session and return its attempt
fn start(state: &mut AppState) -> AttemptId {
    let result = update(
        state,
        Message::StartSession {
            game: racer(),
            regions: None,
        },
    );
    match result.action {
        Some(UpdateAction::ConnectBridge { attempt }) => attempt,
        other => panic!("expected ConnectBridge, got {other:?}"),
    }
}

/// Drive a session to WaitingForSession with arn "s1"
fn waiting(state: &mut AppState) -> AttemptId {
    let attempt = start(state);
    update(
        state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );
    let result = update(
        state,
        Message::SessionCreated {
            attempt,
            group_id: "sg-a".into(),
            response: created("s1"),
        },
    );
    assert!(matches!(
        result.action,
        Some(UpdateAction::StartPolling { .. })
    ));
    attempt
}

/// Drive a session to Active
fn active(state: &mut AppState) -> AttemptId {
    let attempt = waiting(state);
    update(
        state,
        Message::SessionReady {
            attempt,
            region: "us-west-2".into(),
            remote_signal: "R".into(),
        },
    );
    update(
        state,
        Message::RemoteSignalApplied {
            attempt,
            signal: "R".into(),
        },
    );
    assert_eq!(state.session_status(), Some(SessionStatus::Active));
    attempt
}

fn teardown_arn(result: &UpdateResult) -> Option<Option<String>> {
    match &result.action {
        Some(UpdateAction::TeardownSession { arn, .. }) => Some(arn.clone()),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────
// Basics
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    assert_ne!(state.phase, AppPhase::Quitting);

    update(&mut state, Message::Quit);

    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
}

#[test]
fn test_tick_advances_only_while_loading() {
    let mut state = catalog_state();
    update(&mut state, Message::Tick);
    assert_eq!(state.ticks, 0);

    start(&mut state);
    update(&mut state, Message::Tick);
    assert_eq!(state.ticks, 1);
}

// ─────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────

#[test]
fn test_fetch_catalog_requests_action_once() {
    let mut state = AppState::new();
    let first = update(&mut state, Message::FetchCatalog);
    let second = update(&mut state, Message::FetchCatalog);

    assert!(matches!(first.action, Some(UpdateAction::FetchCatalog)));
    assert!(second.action.is_none());
    assert!(state.catalog.loading);
}

#[test]
fn test_catalog_loaded_replaces_games() {
    let mut state = AppState::new();
    update(&mut state, Message::FetchCatalog);
    update(
        &mut state,
        Message::CatalogLoaded {
            games: vec![test_game("a", "Racer", 1)],
        },
    );

    assert!(!state.catalog.loading);
    assert_eq!(state.catalog.games.len(), 1);
    assert_eq!(state.catalog.generation, 1);
}

#[test]
fn test_catalog_failure_without_fallback_keeps_list() {
    let mut state = catalog_state();
    update(
        &mut state,
        Message::CatalogFailed {
            error: Error::catalog_unavailable("HTTP 502"),
        },
    );

    assert_eq!(state.catalog.games.len(), 2);
    assert!(!state.catalog.offline);
    assert!(state.catalog.error.as_deref().unwrap().contains("HTTP 502"));
}

#[test]
fn test_catalog_failure_uses_sorted_fallback() {
    let mut state = AppState::new();
    state.settings.catalog.fallback = vec![
        test_game("c", "C", 2),
        test_game("b", "B", 1),
        test_game("a", "A", 1),
    ];

    update(
        &mut state,
        Message::CatalogFailed {
            error: Error::catalog_unavailable("offline"),
        },
    );

    let names: Vec<_> = state.catalog.games.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(state.catalog.offline);
    assert!(state.notice.as_deref().unwrap().starts_with("Offline catalog"));
}

#[test]
fn test_play_selected_starts_highlighted_game() {
    let mut state = catalog_state();
    state.catalog.select_next();

    let result = update(&mut state, Message::PlaySelected);
    match result.message {
        Some(Message::StartSession { game, regions }) => {
            assert_eq!(game.app_id, "b");
            assert!(regions.is_none());
        }
        other => panic!("unexpected follow-up: {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────
// Session start
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_creates_initializing_session() {
    let mut state = catalog_state();
    let attempt = start(&mut state);

    let session = state.session.as_ref().unwrap();
    assert_eq!(session.attempt, attempt);
    assert_eq!(session.status, SessionStatus::Initializing);
    assert_eq!(session.game_name, "Racer");
    assert_eq!(state.ui_mode, UiMode::Session);
}

#[test]
fn test_start_uses_default_regions() {
    let mut state = catalog_state();
    state.settings.session.default_regions = vec!["eu-central-1".into()];
    start(&mut state);
    assert_eq!(state.session.as_ref().unwrap().regions, vec!["eu-central-1"]);
}

#[test]
fn test_second_start_while_live_is_ignored() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    let result = update(
        &mut state,
        Message::StartSession {
            game: racer(),
            regions: None,
        },
    );

    assert!(result.action.is_none());
    assert_eq!(state.session.as_ref().unwrap().attempt, attempt);
}

#[test]
fn test_bridge_connected_requests_create() {
    let mut state = catalog_state();
    let attempt = start(&mut state);

    let result = update(
        &mut state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );

    assert_eq!(state.session_status(), Some(SessionStatus::CreatingSession));
    match result.action {
        Some(UpdateAction::CreateSession { game, .. }) => assert_eq!(game, racer()),
        other => panic!("expected CreateSession, got {other:?}"),
    }
}

#[test]
fn test_create_network_failure_is_error_with_network_text() {
    let mut state = catalog_state();
    let attempt = start(&mut state);
    update(
        &mut state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );

    update(
        &mut state,
        Message::SessionCreateFailed {
            attempt,
            error: Error::create_failed(FailureKind::Network, "connection refused"),
        },
    );

    let view = state.session_view().unwrap();
    assert_eq!(view.status, SessionStatus::Error);
    assert!(view.error_text.unwrap().starts_with("Network error"));
}

#[test]
fn test_sdk_not_initialized_surfaces_verbatim() {
    let mut state = catalog_state();
    let attempt = start(&mut state);
    update(
        &mut state,
        Message::BridgeConnectFailed {
            attempt,
            error: Error::SdkNotInitialized,
        },
    );

    let text = state.session_view().unwrap().error_text.unwrap();
    assert_eq!(text, Error::SdkNotInitialized.to_string());
}

// ─────────────────────────────────────────────────────────
// Creation and readiness
// ─────────────────────────────────────────────────────────

#[test]
fn test_session_created_starts_polling() {
    let mut state = catalog_state();
    waiting(&mut state);

    let session = state.session.as_ref().unwrap();
    assert_eq!(session.status, SessionStatus::WaitingForSession);
    assert_eq!(session.arn, "s1");
    assert!(session.polling);
}

#[test]
fn test_duplicate_create_result_does_not_start_second_loop() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    let result = update(
        &mut state,
        Message::SessionCreated {
            attempt,
            group_id: "sg-a".into(),
            response: created("s1"),
        },
    );
    assert!(result.action.is_none());
}

#[test]
fn test_create_response_with_signal_skips_polling() {
    let mut state = catalog_state();
    let attempt = start(&mut state);
    update(
        &mut state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );

    let result = update(
        &mut state,
        Message::SessionCreated {
            attempt,
            group_id: "sg-a".into(),
            response: CreateSessionResponse {
                arn: "s1".into(),
                status: Some("ACTIVE".into()),
                signal_response: Some("R".into()),
                ..Default::default()
            },
        },
    );

    match result.action {
        Some(UpdateAction::ApplyRemoteSignal { signal, .. }) => assert_eq!(signal, "R"),
        other => panic!("expected ApplyRemoteSignal, got {other:?}"),
    }
    assert!(!state.session.as_ref().unwrap().polling);
}

#[test]
fn test_poll_progress_updates_status_message() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    update(
        &mut state,
        Message::PollProgress {
            attempt,
            poll: 3,
            response: status_response("PENDING", None),
        },
    );

    let view = state.session_view().unwrap();
    assert_eq!(view.poll_count, 3);
    assert!(view.status_message.unwrap().contains("PENDING, check 3/10"));
}

#[test]
fn test_ready_then_applied_is_active() {
    let mut state = catalog_state();
    active(&mut state);

    let session = state.session.as_ref().unwrap();
    assert_eq!(session.remote_signal.as_deref(), Some("R"));
    assert_eq!(session.region, "us-west-2");
    assert!(!session.polling);
}

#[test]
fn test_rejected_signal_is_error() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);
    update(
        &mut state,
        Message::SessionReady {
            attempt,
            region: String::new(),
            remote_signal: "R".into(),
        },
    );

    update(
        &mut state,
        Message::RemoteSignalRejected {
            attempt,
            error: Error::signal_rejected("bad answer"),
        },
    );

    let session = state.session.as_ref().unwrap();
    assert_eq!(session.status, SessionStatus::Error);
    assert!(session.remote_signal.is_none());
    assert_eq!(session.arn, "s1");
}

#[test]
fn test_poll_timeout_is_error_and_cancels_loop() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    let result = update(
        &mut state,
        Message::PollFailed {
            attempt,
            error: Error::PollingTimedOut {
                attempts: 10,
                elapsed: std::time::Duration::from_secs(27),
            },
        },
    );

    assert!(matches!(
        result.action,
        Some(UpdateAction::CancelPolling { .. })
    ));
    let view = state.session_view().unwrap();
    assert_eq!(view.status, SessionStatus::Error);
    assert!(view.error_text.unwrap().contains("Timed out"));
}

// ─────────────────────────────────────────────────────────
// Stale attempts
// ─────────────────────────────────────────────────────────

#[test]
fn test_results_of_stale_attempt_are_dropped() {
    let mut state = catalog_state();
    let stale = AttemptId::default();
    waiting(&mut state);

    update(
        &mut state,
        Message::PollFailed {
            attempt: stale,
            error: Error::status_check_failed("late"),
        },
    );

    assert_eq!(
        state.session_status(),
        Some(SessionStatus::WaitingForSession)
    );
}

#[test]
fn test_session_created_for_abandoned_attempt_is_terminated() {
    let mut state = catalog_state();
    let attempt = start(&mut state);
    update(
        &mut state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );
    // User backs out while create is in flight
    update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );
    update(&mut state, Message::SessionTornDown { attempt });
    assert!(state.session.is_none());

    let result = update(
        &mut state,
        Message::SessionCreated {
            attempt,
            group_id: "sg-a".into(),
            response: created("s9"),
        },
    );

    assert_eq!(teardown_arn(&result), Some(Some("s9".to_string())));
}

#[test]
fn test_bridge_for_abandoned_attempt_is_closed() {
    let mut state = catalog_state();
    let attempt = start(&mut state);
    update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: true,
        },
    );

    let result = update(
        &mut state,
        Message::BridgeConnected {
            attempt,
            bridge: bridge(),
        },
    );

    match result.action {
        Some(UpdateAction::TeardownSession { arn, bridge, .. }) => {
            assert!(arn.is_none());
            assert!(bridge.is_some());
        }
        other => panic!("expected TeardownSession, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────
// Exit and teardown
// ─────────────────────────────────────────────────────────

#[test]
fn test_exit_from_active_asks_for_confirmation() {
    let mut state = catalog_state();
    active(&mut state);

    let result = update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );

    assert!(result.action.is_none());
    assert_eq!(state.ui_mode, UiMode::ConfirmExit);

    update(&mut state, Message::CancelExit);
    assert_eq!(state.ui_mode, UiMode::Session);
    assert_eq!(state.session_status(), Some(SessionStatus::Active));
}

#[test]
fn test_confirmed_exit_tears_down_once() {
    let mut state = catalog_state();
    let attempt = active(&mut state);
    update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );

    let first = update(&mut state, Message::ConfirmExit);
    let second = update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: true,
        },
    );

    assert_eq!(teardown_arn(&first), Some(Some("s1".to_string())));
    assert!(second.action.is_none());
    assert_eq!(state.session_status(), Some(SessionStatus::Ending));

    update(&mut state, Message::SessionTornDown { attempt });
    assert!(state.session.is_none());
    assert_eq!(state.ui_mode, UiMode::Catalog);
}

#[test]
fn test_exit_without_confirmation_setting() {
    let mut state = catalog_state();
    state.settings.session.confirm_exit = false;
    active(&mut state);

    let result = update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );
    assert_eq!(teardown_arn(&result), Some(Some("s1".to_string())));
}

#[test]
fn test_exit_while_loading_tears_down_immediately() {
    let mut state = catalog_state();
    waiting(&mut state);

    let result = update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );

    assert_eq!(teardown_arn(&result), Some(Some("s1".to_string())));
    assert_eq!(state.session_status(), Some(SessionStatus::Ending));
}

#[test]
fn test_exit_from_error_terminates_kept_arn() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);
    update(
        &mut state,
        Message::PollFailed {
            attempt,
            error: Error::status_check_failed("HTTP 500"),
        },
    );

    let result = update(
        &mut state,
        Message::ExitRequested {
            skip_confirmation: false,
        },
    );
    assert_eq!(teardown_arn(&result), Some(Some("s1".to_string())));
}

// ─────────────────────────────────────────────────────────
// Retry
// ─────────────────────────────────────────────────────────

#[test]
fn test_retry_discards_failed_session_and_restarts() {
    let mut state = catalog_state();
    state.settings.session.default_regions = vec!["us-east-1".into()];
    let first = waiting(&mut state);
    update(
        &mut state,
        Message::PollFailed {
            attempt: first,
            error: Error::status_check_failed("HTTP 500"),
        },
    );

    let result = update(&mut state, Message::Retry);

    assert_eq!(teardown_arn(&result), Some(Some("s1".to_string())));
    assert!(state.session.is_none());
    let Some(restart) = result.message else {
        panic!("retry should restart the session");
    };

    let result = update(&mut state, restart);
    let second = match result.action {
        Some(UpdateAction::ConnectBridge { attempt }) => attempt,
        other => panic!("expected ConnectBridge, got {other:?}"),
    };
    assert!(second > first);

    let session = state.session.as_ref().unwrap();
    assert_eq!(session.status, SessionStatus::Initializing);
    assert!(session.arn.is_empty());
    assert_eq!(session.id, racer());
    assert_eq!(session.regions, vec!["us-east-1"]);

    // The old teardown finishing must not touch the new session
    update(&mut state, Message::SessionTornDown { attempt: first });
    assert!(state.session.is_some());
}

#[test]
fn test_retry_ignored_unless_failed() {
    let mut state = catalog_state();
    waiting(&mut state);

    let result = update(&mut state, Message::Retry);
    assert!(result.action.is_none());
    assert!(result.message.is_none());
}

// ─────────────────────────────────────────────────────────
// Bridge events
// ─────────────────────────────────────────────────────────

#[test]
fn test_disconnect_while_active_tears_down_once() {
    let mut state = catalog_state();
    let attempt = active(&mut state);
    let disconnected = || Message::Bridge {
        attempt,
        event: BridgeEvent::ConnectionStateChanged(ConnectionState::Disconnected),
    };

    let first = update(&mut state, disconnected());
    let second = update(&mut state, disconnected());

    assert_eq!(teardown_arn(&first), Some(Some("s1".to_string())));
    assert!(second.action.is_none());
    assert_eq!(state.session_status(), Some(SessionStatus::Ending));
}

#[test]
fn test_terminal_server_disconnect_tears_down() {
    let mut state = catalog_state();
    let attempt = active(&mut state);

    let result = update(
        &mut state,
        Message::Bridge {
            attempt,
            event: BridgeEvent::ServerDisconnected("IDLE".into()),
        },
    );
    assert!(teardown_arn(&result).is_some());
}

#[test]
fn test_non_terminal_events_only_update_status_message() {
    let mut state = catalog_state();
    let attempt = active(&mut state);

    for event in [
        BridgeEvent::ServerDisconnected("maintenance".into()),
        BridgeEvent::ChannelError("input channel closed".into()),
        BridgeEvent::StatusUpdate("Buffering".into()),
    ] {
        let result = update(&mut state, Message::Bridge { attempt, event });
        assert!(result.action.is_none());
    }

    let view = state.session_view().unwrap();
    assert_eq!(view.status, SessionStatus::Active);
    assert_eq!(view.status_message.as_deref(), Some("Buffering"));
}

#[test]
fn test_stream_end_before_active_is_error() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    let result = update(
        &mut state,
        Message::Bridge {
            attempt,
            event: BridgeEvent::SessionEnded,
        },
    );

    assert!(matches!(
        result.action,
        Some(UpdateAction::CancelPolling { .. })
    ));
    assert_eq!(state.session_status(), Some(SessionStatus::Error));
}

#[test]
fn test_back_button_follows_exit_flow() {
    let mut state = catalog_state();
    let attempt = active(&mut state);

    update(
        &mut state,
        Message::Bridge {
            attempt,
            event: BridgeEvent::BackRequested,
        },
    );
    assert_eq!(state.ui_mode, UiMode::ConfirmExit);
}

#[test]
fn test_renegotiation_updates_session() {
    let mut state = catalog_state();
    let attempt = active(&mut state);

    let result = update(
        &mut state,
        Message::Bridge {
            attempt,
            event: BridgeEvent::RenegotiationRequested("offer-2".into()),
        },
    );

    match result.action {
        Some(UpdateAction::UpdateSession {
            arn, local_signal, ..
        }) => {
            assert_eq!(arn, "s1");
            assert_eq!(local_signal, "offer-2");
        }
        other => panic!("expected UpdateSession, got {other:?}"),
    }

    let result = update(
        &mut state,
        Message::SessionUpdated {
            attempt,
            remote_signal: Some("R2".into()),
        },
    );
    assert!(matches!(
        result.action,
        Some(UpdateAction::ApplyRemoteSignal { .. })
    ));

    update(
        &mut state,
        Message::RemoteSignalApplied {
            attempt,
            signal: "R2".into(),
        },
    );
    let session = state.session.as_ref().unwrap();
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.remote_signal.as_deref(), Some("R2"));
}

#[test]
fn test_renegotiation_failure_is_error() {
    let mut state = catalog_state();
    let attempt = active(&mut state);

    update(
        &mut state,
        Message::SessionUpdateFailed {
            attempt,
            error: Error::update_failed("HTTP 409"),
        },
    );
    assert_eq!(state.session_status(), Some(SessionStatus::Error));
}

#[test]
fn test_renegotiation_before_create_is_ignored() {
    let mut state = catalog_state();
    let attempt = start(&mut state);

    let result = update(
        &mut state,
        Message::Bridge {
            attempt,
            event: BridgeEvent::RenegotiationRequested("offer".into()),
        },
    );
    assert!(result.action.is_none());
}

// ─────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_catalog_keys() {
    let state = catalog_state();
    assert!(matches!(
        handle_key(&state, InputKey::Down),
        Some(Message::SelectNext)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::PlaySelected)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('R')),
        Some(Message::FetchCatalog)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_session_keys() {
    let mut state = catalog_state();
    let attempt = waiting(&mut state);

    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::ExitRequested {
            skip_confirmation: false
        })
    ));
    assert!(handle_key(&state, InputKey::Char('r')).is_none());

    update(
        &mut state,
        Message::PollFailed {
            attempt,
            error: Error::status_check_failed("x"),
        },
    );
    assert!(matches!(
        handle_key(&state, InputKey::Char('r')),
        Some(Message::Retry)
    ));
}

#[test]
fn test_confirm_dialog_keys() {
    let mut state = catalog_state();
    state.ui_mode = UiMode::ConfirmExit;

    assert!(matches!(
        handle_key(&state, InputKey::Char('y')),
        Some(Message::ConfirmExit)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::CancelExit)
    ));
}
