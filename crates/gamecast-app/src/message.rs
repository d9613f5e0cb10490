//! Message types for the application (TEA pattern)

use std::sync::Arc;

use gamecast_backend::{CreateSessionResponse, SessionStatusResponse, SignalingBridge};
use gamecast_core::{AttemptId, BridgeEvent, Error, Game, GameId};

use crate::input_key::InputKey;

/// All possible messages/actions in the application.
///
/// Not `Clone`: failures travel as [`Error`] values so the session keeps the
/// original error for display and classification.
#[derive(Debug)]
pub enum Message {
    /// Key press from the terminal or a remote control
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit the application (Ctrl+C, signal handler, `q`)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────
    /// (Re)load the game list
    FetchCatalog,

    CatalogLoaded {
        games: Vec<Game>,
    },

    CatalogFailed {
        error: Error,
    },

    SelectNext,
    SelectPrevious,

    // ─────────────────────────────────────────────────────────
    // Shell Intents
    // ─────────────────────────────────────────────────────────
    /// Start a session for the highlighted game
    PlaySelected,

    /// Start a session; `regions` of `None` uses the configured defaults
    StartSession {
        game: GameId,
        regions: Option<Vec<String>>,
    },

    /// Restart a failed session with the same parameters
    Retry,

    /// Leave the session (back button, `exit` command)
    ExitRequested {
        skip_confirmation: bool,
    },

    /// Confirm the exit dialog
    ConfirmExit,

    /// Dismiss the exit dialog
    CancelExit,

    // ─────────────────────────────────────────────────────────
    // Session Lifecycle (results of background work)
    // ─────────────────────────────────────────────────────────
    /// The per-attempt streaming SDK connection is up
    BridgeConnected {
        attempt: AttemptId,
        bridge: Arc<SignalingBridge>,
    },

    /// No credential, or the SDK connection could not be made
    BridgeConnectFailed {
        attempt: AttemptId,
        error: Error,
    },

    LocalSignalGenerated {
        attempt: AttemptId,
        signal: String,
    },

    SessionCreated {
        attempt: AttemptId,
        /// Needed to terminate the session if the attempt was abandoned
        group_id: String,
        response: CreateSessionResponse,
    },

    SessionCreateFailed {
        attempt: AttemptId,
        error: Error,
    },

    /// One status check completed without the session being ready
    PollProgress {
        attempt: AttemptId,
        poll: u32,
        response: SessionStatusResponse,
    },

    /// The backend reports the session ready with a remote signal
    SessionReady {
        attempt: AttemptId,
        region: String,
        remote_signal: String,
    },

    /// Poll failure, exhausted budget or timeout
    PollFailed {
        attempt: AttemptId,
        error: Error,
    },

    /// The SDK accepted the remote signal and input is attached
    RemoteSignalApplied {
        attempt: AttemptId,
        signal: String,
    },

    RemoteSignalRejected {
        attempt: AttemptId,
        error: Error,
    },

    /// Push event from the streaming SDK
    Bridge {
        attempt: AttemptId,
        event: BridgeEvent,
    },

    SessionUpdated {
        attempt: AttemptId,
        remote_signal: Option<String>,
    },

    SessionUpdateFailed {
        attempt: AttemptId,
        error: Error,
    },

    /// Teardown of `attempt` has finished (terminate sent, bridge closed)
    SessionTornDown {
        attempt: AttemptId,
    },
}

impl Message {
    /// The attempt a lifecycle message belongs to
    pub fn attempt(&self) -> Option<AttemptId> {
        match self {
            Message::BridgeConnected { attempt, .. }
            | Message::BridgeConnectFailed { attempt, .. }
            | Message::LocalSignalGenerated { attempt, .. }
            | Message::SessionCreated { attempt, .. }
            | Message::SessionCreateFailed { attempt, .. }
            | Message::PollProgress { attempt, .. }
            | Message::SessionReady { attempt, .. }
            | Message::PollFailed { attempt, .. }
            | Message::RemoteSignalApplied { attempt, .. }
            | Message::RemoteSignalRejected { attempt, .. }
            | Message::Bridge { attempt, .. }
            | Message::SessionUpdated { attempt, .. }
            | Message::SessionUpdateFailed { attempt, .. }
            | Message::SessionTornDown { attempt } => Some(*attempt),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_messages_carry_attempt() {
        let attempt = AttemptId::default().next();
        let msg = Message::PollFailed {
            attempt,
            error: Error::status_check_failed("x"),
        };
        assert_eq!(msg.attempt(), Some(attempt));
        assert_eq!(Message::Tick.attempt(), None);
        assert_eq!(Message::Retry.attempt(), None);
    }
}
