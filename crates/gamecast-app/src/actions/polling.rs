//! Readiness poll loop
//!
//! Polls `get_session_status` until the session is ready, bounded by both an
//! attempt budget and a wall-clock deadline, whichever is hit first. The
//! first check runs immediately; later checks wait `interval` (never past the
//! deadline). An in-flight request is abandoned when the deadline passes or
//! the attempt is cancelled.

use std::time::Duration;

use gamecast_backend::{SessionApi, SessionStatusResponse};
use gamecast_core::{Error, RemoteStatus};
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::config::PollPolicy;
use crate::session::ready_signal;

/// How a poll loop ended
#[derive(Debug)]
pub enum PollOutcome {
    Ready {
        region: String,
        remote_signal: String,
        attempts: u32,
    },
    /// A status check failed, or the backend reported a failed session
    Failed(Error),
    /// Attempt budget exhausted or deadline passed
    TimedOut { attempts: u32, elapsed: Duration },
    Cancelled,
}

/// Resolves once `cancel` is set (or its sender is gone)
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|c| *c).await;
}

/// Poll until ready, failed, out of budget, or cancelled.
///
/// `on_progress` sees every response that did not end the loop.
pub async fn poll_until_ready(
    api: &dyn SessionApi,
    group_id: &str,
    arn: &str,
    policy: PollPolicy,
    accept_signal_without_active: bool,
    mut cancel: watch::Receiver<bool>,
    mut on_progress: impl FnMut(u32, &SessionStatusResponse),
) -> PollOutcome {
    let started = Instant::now();
    let deadline = started + policy.timeout;
    let mut attempts: u32 = 0;

    loop {
        if attempts >= policy.max_attempts {
            return PollOutcome::TimedOut {
                attempts,
                elapsed: started.elapsed(),
            };
        }

        if attempts > 0 {
            let wake = (Instant::now() + policy.interval).min(deadline);
            tokio::select! {
                _ = sleep_until(wake) => {}
                _ = cancelled(&mut cancel) => return PollOutcome::Cancelled,
            }
        }

        if Instant::now() >= deadline {
            return PollOutcome::TimedOut {
                attempts,
                elapsed: started.elapsed(),
            };
        }

        attempts += 1;
        let result = tokio::select! {
            result = api.get_session_status(group_id, arn) => result,
            _ = sleep_until(deadline) => {
                debug!("Status check {} abandoned at the deadline", attempts);
                return PollOutcome::TimedOut {
                    attempts,
                    elapsed: started.elapsed(),
                };
            }
            _ = cancelled(&mut cancel) => return PollOutcome::Cancelled,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => return PollOutcome::Failed(e),
        };

        let remote = response.status().map(RemoteStatus::parse);
        if let Some(remote) = remote.as_ref().filter(|r| r.is_failed()) {
            return PollOutcome::Failed(Error::status_check_failed(format!(
                "session entered {remote} state"
            )));
        }

        if let Some(signal) = ready_signal(
            response.status(),
            response.remote_signal(),
            accept_signal_without_active,
        ) {
            return PollOutcome::Ready {
                region: response.region().unwrap_or_default().to_string(),
                remote_signal: signal.to_string(),
                attempts,
            };
        }

        debug!(
            "Session {} is {} (check {})",
            arn,
            response.status().unwrap_or("without status"),
            attempts
        );
        on_progress(attempts, &response);
    }
}
