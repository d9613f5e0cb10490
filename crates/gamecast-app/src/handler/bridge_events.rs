//! Streaming SDK push events

use gamecast_core::{AttemptId, BridgeEvent, Error, SessionStatus};
use tracing::{debug, info, warn};

use crate::state::AppState;

use super::session_lifecycle::{
    begin_teardown, handle_attempt_failed, handle_exit_requested, handle_renegotiation,
};
use super::UpdateResult;

/// Short text for logs and error messages
fn describe(event: &BridgeEvent) -> String {
    match event {
        BridgeEvent::ConnectionStateChanged(state) => format!("connection {state}"),
        BridgeEvent::ServerDisconnected(reason) => format!("server disconnected ({reason})"),
        BridgeEvent::SessionEnded => "stream ended".to_string(),
        BridgeEvent::ChannelError(e) => format!("channel error: {e}"),
        BridgeEvent::BackRequested => "back pressed".to_string(),
        BridgeEvent::StatusUpdate(text) => text.clone(),
        BridgeEvent::RenegotiationRequested(_) => "renegotiation".to_string(),
    }
}

pub fn handle_event(state: &mut AppState, attempt: AttemptId, event: BridgeEvent) -> UpdateResult {
    let Some(status) = state.session_for(attempt).map(|s| s.status) else {
        debug!("Dropping {} from stale attempt {}", describe(&event), attempt);
        return UpdateResult::none();
    };

    // The back button works from every state, including Error
    if matches!(event, BridgeEvent::BackRequested) {
        return handle_exit_requested(state, false);
    }

    if matches!(status, SessionStatus::Ending | SessionStatus::Error) {
        return UpdateResult::none();
    }

    if event.ends_session() {
        let what = describe(&event);
        if status == SessionStatus::Active {
            info!("Stream lost: {}", what);
            return begin_teardown(state, &what);
        }
        return handle_attempt_failed(
            state,
            attempt,
            Error::webview(format!("stream ended before the session started: {what}")),
        );
    }

    if let BridgeEvent::RenegotiationRequested(payload) = event {
        return handle_renegotiation(state, attempt, payload);
    }

    let message = match event {
        BridgeEvent::StatusUpdate(text) => text,
        BridgeEvent::ChannelError(e) => {
            warn!("Stream channel error: {}", e);
            format!("Channel error: {e}")
        }
        BridgeEvent::ServerDisconnected(reason) => {
            warn!("Server disconnect notice: {}", reason);
            format!("Server notice: {reason}")
        }
        BridgeEvent::ConnectionStateChanged(connection) => {
            debug!("Connection state: {}", connection);
            format!("Connection {connection}")
        }
        other => {
            debug!("Unhandled bridge event: {:?}", other);
            return UpdateResult::none();
        }
    };

    if let Some(session) = state.session_for(attempt) {
        session.status_message = Some(message);
    }
    UpdateResult::none()
}
