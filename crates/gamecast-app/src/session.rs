//! The play session owned by the coordinator

use std::sync::Arc;

use gamecast_backend::SignalingBridge;
use gamecast_core::{AttemptId, Error, GameId, RemoteStatus, SessionStatus};

/// State of the single play session.
///
/// Mutated only by the update function. Background tasks refer to a session
/// by its [`AttemptId`]; results carrying any other attempt are dropped.
#[derive(Debug)]
pub struct Session {
    pub id: GameId,
    pub game_name: String,

    /// Backend identifier; empty until `create_session` succeeds
    pub arn: String,
    pub region: String,
    pub status: SessionStatus,

    pub local_signal: Option<String>,
    /// Only meaningful while `Active`
    pub remote_signal: Option<String>,
    /// Present only in the `Error` state
    pub last_error: Option<Error>,

    pub attempt: AttemptId,
    /// Requested regions, reused on retry
    pub regions: Vec<String>,
    /// The poll loop for this attempt is running
    pub polling: bool,
    /// Status checks made so far
    pub poll_count: u32,
    /// Latest progress text for the loading view
    pub status_message: Option<String>,

    pub bridge: Option<Arc<SignalingBridge>>,

    /// The backend session was already terminated (or never existed)
    terminated: bool,
}

impl Session {
    pub fn new(
        attempt: AttemptId,
        id: GameId,
        game_name: impl Into<String>,
        regions: Vec<String>,
    ) -> Self {
        Self {
            id,
            game_name: game_name.into(),
            arn: String::new(),
            region: String::new(),
            status: SessionStatus::Initializing,
            local_signal: None,
            remote_signal: None,
            last_error: None,
            attempt,
            regions,
            polling: false,
            poll_count: 0,
            status_message: None,
            bridge: None,
            terminated: false,
        }
    }

    /// Move to `Error`, stopping any polling.
    ///
    /// The arn is kept so the backend session can still be terminated.
    pub fn fail(&mut self, error: Error) {
        self.status = SessionStatus::Error;
        self.last_error = Some(error);
        self.polling = false;
        self.remote_signal = None;
    }

    /// Human-readable reason of the failure, if any
    pub fn error_text(&self) -> Option<String> {
        self.last_error.as_ref().map(|e| e.to_string())
    }

    /// Take what teardown needs: the arn (at most once) and the bridge.
    ///
    /// Returns `None` for the arn when there is no backend session or it was
    /// already handed out, which makes repeated teardown a no-op towards the
    /// backend.
    pub fn take_teardown(&mut self) -> (Option<String>, Option<Arc<SignalingBridge>>) {
        let arn = if self.terminated || self.arn.is_empty() {
            None
        } else {
            Some(self.arn.clone())
        };
        self.terminated = true;
        self.polling = false;
        (arn, self.bridge.take())
    }
}

/// Decide whether a backend response means the session is ready.
///
/// Returns the remote signal to apply when it is. A response without a
/// signal is never ready, since there would be nothing to hand the SDK.
pub fn ready_signal<'a>(
    status: Option<&str>,
    signal: Option<&'a str>,
    accept_signal_without_active: bool,
) -> Option<&'a str> {
    let signal = signal.filter(|s| !s.trim().is_empty())?;
    let active = status
        .map(|s| RemoteStatus::parse(s).is_active())
        .unwrap_or(false);
    (active || accept_signal_without_active).then_some(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            AttemptId::default().next(),
            GameId::new("app", "sg"),
            "Racer",
            vec![],
        )
    }

    #[test]
    fn test_new_session_is_initializing() {
        let s = session();
        assert_eq!(s.status, SessionStatus::Initializing);
        assert!(s.arn.is_empty());
        assert!(s.error_text().is_none());
    }

    #[test]
    fn test_fail_keeps_arn_and_stops_polling() {
        let mut s = session();
        s.arn = "s1".into();
        s.polling = true;
        s.fail(Error::status_check_failed("boom"));

        assert_eq!(s.status, SessionStatus::Error);
        assert_eq!(s.arn, "s1");
        assert!(!s.polling);
        assert!(s.error_text().unwrap().contains("boom"));
    }

    #[test]
    fn test_take_teardown_hands_out_arn_once() {
        let mut s = session();
        s.arn = "s1".into();

        let (first, _) = s.take_teardown();
        let (second, _) = s.take_teardown();
        assert_eq!(first.as_deref(), Some("s1"));
        assert!(second.is_none());
    }

    #[test]
    fn test_take_teardown_without_arn() {
        let mut s = session();
        let (arn, bridge) = s.take_teardown();
        assert!(arn.is_none());
        assert!(bridge.is_none());
    }

    #[test]
    fn test_ready_on_active_with_signal() {
        assert_eq!(ready_signal(Some("ACTIVE"), Some("R"), false), Some("R"));
    }

    #[test]
    fn test_active_without_signal_is_not_ready() {
        assert_eq!(ready_signal(Some("ACTIVE"), None, true), None);
        assert_eq!(ready_signal(Some("ACTIVE"), Some(""), true), None);
    }

    #[test]
    fn test_signal_without_active_depends_on_shim() {
        assert_eq!(ready_signal(Some("PENDING"), Some("R"), true), Some("R"));
        assert_eq!(ready_signal(Some("PENDING"), Some("R"), false), None);
        assert_eq!(ready_signal(None, Some("R"), true), Some("R"));
    }
}
