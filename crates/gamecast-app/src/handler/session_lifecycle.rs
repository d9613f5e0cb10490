//! Session lifecycle handlers
//!
//! The session state machine:
//! `Initializing -> CreatingSession -> WaitingForSession -> Active -> {Ending, Error}`.
//!
//! Every result of background work carries the [`AttemptId`] it was started
//! for. Results for any attempt other than the live one are dropped, except
//! where they hold a resource (a bridge, a created backend session) that has
//! to be released.

use std::sync::Arc;

use gamecast_backend::{CreateSessionResponse, SessionStatusResponse, SignalingBridge};
use gamecast_core::{AttemptId, Error, GameId, RemoteStatus, SessionStatus};
use tracing::{debug, info, warn};

use crate::message::Message;
use crate::session::{ready_signal, Session};
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

/// The session for `attempt`, unless it already failed or is ending
fn live_session(state: &mut AppState, attempt: AttemptId) -> Option<&mut Session> {
    state
        .session_for(attempt)
        .filter(|s| !matches!(s.status, SessionStatus::Ending | SessionStatus::Error))
}

/// Remove the current session and return the teardown for it
fn discard_session(state: &mut AppState) -> Option<UpdateAction> {
    let mut session = state.session.take()?;
    let (arn, bridge) = session.take_teardown();
    Some(UpdateAction::TeardownSession {
        attempt: session.attempt,
        group_id: session.id.group_id,
        arn,
        bridge,
    })
}

// ─────────────────────────────────────────────────────────
// Shell intents
// ─────────────────────────────────────────────────────────

/// Start a session for `game`.
///
/// Ignored while another session is being set up or is active, so a repeated
/// start never creates a second backend session. A failed session is
/// discarded first, terminating its backend session in the background.
pub fn handle_start(
    state: &mut AppState,
    game: GameId,
    regions: Option<Vec<String>>,
) -> UpdateResult {
    if let Some(current) = &state.session {
        match current.status {
            SessionStatus::Error => {
                let teardown = discard_session(state);
                return UpdateResult {
                    message: Some(Message::StartSession { game, regions }),
                    action: teardown,
                };
            }
            // Its teardown is already running and owns everything it needs
            SessionStatus::Ending => {}
            status => {
                debug!("Ignoring start of {}: a session is already {}", game, status);
                return UpdateResult::none();
            }
        }
    }

    let listed = state.catalog.games.iter().find(|g| g.id() == game);
    let game_name = listed
        .map(|g| g.name.clone())
        .unwrap_or_else(|| game.app_id.clone());

    let defaults = &state.settings.session.default_regions;
    let regions = regions
        .filter(|r| !r.is_empty())
        .or_else(|| (!defaults.is_empty()).then(|| defaults.clone()))
        .or_else(|| listed.map(|g| g.regions.clone()))
        .unwrap_or_default();

    let attempt = state.next_attempt();
    info!("Starting session {} for {} ({})", attempt, game_name, game);

    let mut session = Session::new(attempt, game, game_name, regions);
    session.status_message = Some("Connecting to the stream".to_string());
    state.session = Some(session);
    state.ui_mode = UiMode::Session;
    state.notice = None;

    UpdateResult::action(UpdateAction::ConnectBridge { attempt })
}

/// Restart a failed session with the same game and regions.
///
/// No state of the failed attempt is reused; its backend session (if any)
/// is terminated.
pub fn handle_retry(state: &mut AppState) -> UpdateResult {
    let Some(session) = state.session.as_ref() else {
        return UpdateResult::none();
    };
    if session.status != SessionStatus::Error {
        debug!("Retry ignored: session is {}", session.status);
        return UpdateResult::none();
    }

    let game = session.id.clone();
    let regions = session.regions.clone();
    info!("Retrying session for {}", game);

    let teardown = discard_session(state);
    UpdateResult {
        message: Some(Message::StartSession {
            game,
            regions: Some(regions),
        }),
        action: teardown,
    }
}

pub fn handle_exit_requested(state: &mut AppState, skip_confirmation: bool) -> UpdateResult {
    let confirm = state.settings.session.confirm_exit && !skip_confirmation;

    let Some(session) = state.session.as_ref() else {
        state.ui_mode = UiMode::Catalog;
        return UpdateResult::none();
    };

    match session.status {
        SessionStatus::Ending => UpdateResult::none(),
        SessionStatus::Active if confirm => {
            state.ui_mode = UiMode::ConfirmExit;
            UpdateResult::none()
        }
        _ => begin_teardown(state, "user exit"),
    }
}

pub fn handle_confirm_exit(state: &mut AppState) -> UpdateResult {
    if state.ui_mode != UiMode::ConfirmExit {
        return UpdateResult::none();
    }
    begin_teardown(state, "user exit")
}

pub fn handle_cancel_exit(state: &mut AppState) -> UpdateResult {
    if state.ui_mode == UiMode::ConfirmExit {
        state.ui_mode = UiMode::Session;
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Teardown
// ─────────────────────────────────────────────────────────

/// Move the session to `Ending` and request its teardown.
///
/// The arn is taken out of the session, so a second call (or a later
/// shutdown) finds nothing left to terminate.
pub(crate) fn begin_teardown(state: &mut AppState, reason: &str) -> UpdateResult {
    let Some(session) = state.session.as_mut() else {
        return UpdateResult::none();
    };
    if session.status == SessionStatus::Ending {
        return UpdateResult::none();
    }

    info!("Ending session {} ({})", session.attempt, reason);
    session.status = SessionStatus::Ending;
    session.status_message = Some("Ending session".to_string());
    let (arn, bridge) = session.take_teardown();
    let action = UpdateAction::TeardownSession {
        attempt: session.attempt,
        group_id: session.id.group_id.clone(),
        arn,
        bridge,
    };

    state.ui_mode = UiMode::Session;
    UpdateResult::action(action)
}

pub fn handle_torn_down(state: &mut AppState, attempt: AttemptId) -> UpdateResult {
    let ended = state
        .session
        .as_ref()
        .is_some_and(|s| s.attempt == attempt && s.status == SessionStatus::Ending);

    if ended {
        info!("Session {} ended", attempt);
        state.session = None;
        state.ui_mode = UiMode::Catalog;
    } else {
        debug!("Teardown of attempt {} finished", attempt);
    }
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Background results
// ─────────────────────────────────────────────────────────

pub fn handle_bridge_connected(
    state: &mut AppState,
    attempt: AttemptId,
    bridge: Arc<SignalingBridge>,
) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        debug!("Closing bridge of abandoned attempt {}", attempt);
        return UpdateResult::action(UpdateAction::TeardownSession {
            attempt,
            group_id: String::new(),
            arn: None,
            bridge: Some(bridge),
        });
    };

    session.bridge = Some(bridge.clone());
    session.status = SessionStatus::CreatingSession;
    session.status_message = Some("Creating session".to_string());

    UpdateResult::action(UpdateAction::CreateSession {
        attempt,
        bridge,
        game: session.id.clone(),
        regions: session.regions.clone(),
    })
}

/// Any failure of the live attempt: move to `Error`, keep the arn for
/// teardown, stop the poll loop if it is still running.
pub fn handle_attempt_failed(state: &mut AppState, attempt: AttemptId, error: Error) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        debug!("Ignoring failure of stale attempt {}: {}", attempt, error);
        return UpdateResult::none();
    };

    warn!("Session attempt {} failed: {}", attempt, error);
    let was_polling = session.polling;
    session.fail(error);
    state.ui_mode = UiMode::Session;

    if was_polling {
        UpdateResult::action(UpdateAction::CancelPolling { attempt })
    } else {
        UpdateResult::none()
    }
}

pub fn handle_session_created(
    state: &mut AppState,
    attempt: AttemptId,
    group_id: String,
    response: CreateSessionResponse,
) -> UpdateResult {
    let accept_signal = state.settings.session.accept_signal_without_active;
    let ready = ready_signal(
        response.status.as_deref(),
        response.remote_signal(),
        accept_signal,
    )
    .map(str::to_string);

    let Some(session) = live_session(state, attempt) else {
        warn!(
            "Session {} was created for abandoned attempt {}, terminating it",
            response.arn, attempt
        );
        return UpdateResult::action(UpdateAction::TeardownSession {
            attempt,
            group_id,
            arn: Some(response.arn).filter(|a| !a.is_empty()),
            bridge: None,
        });
    };
    if session.status != SessionStatus::CreatingSession {
        debug!("Unexpected create result in {} state", session.status);
        return UpdateResult::none();
    }

    info!("Session created: {}", response.arn);
    session.arn = response.arn;
    if let Some(region) = response.region.filter(|r| !r.is_empty()) {
        session.region = region;
    }
    session.status = SessionStatus::WaitingForSession;

    if let Some(signal) = ready {
        debug!("Create response already carries the remote signal");
        return apply_remote_signal(session, signal);
    }

    if session.polling {
        debug!("Poll loop already running for attempt {}", attempt);
        return UpdateResult::none();
    }
    session.polling = true;
    session.status_message = Some("Waiting for the session to start".to_string());

    UpdateResult::action(UpdateAction::StartPolling {
        attempt,
        group_id: session.id.group_id.clone(),
        arn: session.arn.clone(),
    })
}

pub fn handle_poll_progress(
    state: &mut AppState,
    attempt: AttemptId,
    poll: u32,
    response: SessionStatusResponse,
) -> UpdateResult {
    let max_attempts = state.settings.session.poll_policy().max_attempts;
    let Some(session) = live_session(state, attempt) else {
        return UpdateResult::none();
    };
    if session.status != SessionStatus::WaitingForSession {
        return UpdateResult::none();
    }

    session.poll_count = poll;
    if let Some(region) = response.region() {
        session.region = region.to_string();
    }
    let remote = response
        .status()
        .map(|s| RemoteStatus::parse(s).to_string())
        .unwrap_or_else(|| "unknown".to_string());
    session.status_message = Some(format!(
        "Waiting for the session to start ({remote}, check {poll}/{max_attempts})"
    ));
    UpdateResult::none()
}

pub fn handle_session_ready(
    state: &mut AppState,
    attempt: AttemptId,
    region: String,
    remote_signal: String,
) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        return UpdateResult::none();
    };
    if session.status != SessionStatus::WaitingForSession {
        return UpdateResult::none();
    }

    session.polling = false;
    if !region.is_empty() {
        session.region = region;
    }
    apply_remote_signal(session, remote_signal)
}

/// Hand `signal` to the session's bridge
fn apply_remote_signal(session: &mut Session, signal: String) -> UpdateResult {
    match session.bridge.clone() {
        Some(bridge) => {
            session.status_message = Some("Starting the stream".to_string());
            UpdateResult::action(UpdateAction::ApplyRemoteSignal {
                attempt: session.attempt,
                bridge,
                signal,
            })
        }
        None => {
            session.fail(Error::SdkNotInitialized);
            UpdateResult::none()
        }
    }
}

pub fn handle_remote_signal_applied(
    state: &mut AppState,
    attempt: AttemptId,
    signal: String,
) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        return UpdateResult::none();
    };

    match session.status {
        SessionStatus::WaitingForSession => {
            info!(
                "Session {} active (region {})",
                session.arn,
                if session.region.is_empty() {
                    "unknown"
                } else {
                    session.region.as_str()
                }
            );
            session.status = SessionStatus::Active;
            session.remote_signal = Some(signal);
            session.status_message = None;
        }
        SessionStatus::Active => {
            debug!("Stream renegotiated for {}", session.arn);
            session.remote_signal = Some(signal);
            session.status_message = Some("Stream renegotiated".to_string());
        }
        status => debug!("Remote signal applied in {} state", status),
    }
    UpdateResult::none()
}

/// Renegotiation answer; applied right away while the stream is running
pub fn handle_session_updated(
    state: &mut AppState,
    attempt: AttemptId,
    remote_signal: Option<String>,
) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        return UpdateResult::none();
    };

    match remote_signal.filter(|s| !s.trim().is_empty()) {
        Some(signal) if session.status == SessionStatus::Active => {
            apply_remote_signal(session, signal)
        }
        _ => UpdateResult::none(),
    }
}

/// The SDK produced a new local signal for a session that already exists
pub fn handle_renegotiation(state: &mut AppState, attempt: AttemptId, payload: String) -> UpdateResult {
    let Some(session) = live_session(state, attempt) else {
        return UpdateResult::none();
    };

    let negotiable = matches!(
        session.status,
        SessionStatus::WaitingForSession | SessionStatus::Active
    );
    if !negotiable || session.arn.is_empty() || payload.trim().is_empty() {
        debug!("Ignoring renegotiation in {} state", session.status);
        return UpdateResult::none();
    }

    info!("Renegotiating stream for {}", session.arn);
    session.local_signal = Some(payload.clone());
    UpdateResult::action(UpdateAction::UpdateSession {
        attempt,
        group_id: session.id.group_id.clone(),
        arn: session.arn.clone(),
        local_signal: payload,
    })
}
