//! Session attempt tasks: SDK connection, creation, polling, signaling and
//! teardown.
//!
//! Each task reports back with a [`Message`] stamped with its attempt; the
//! update function decides whether the result still matters.

use std::sync::Arc;

use gamecast_backend::{CreateSession, SessionApi, SignalingBridge};
use gamecast_core::{AttemptId, BridgeEvent, Error, FailureKind, GameId};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::PollPolicy;
use crate::message::Message;
use crate::services::Services;

use super::polling::{poll_until_ready, PollOutcome};

/// Check the credential, connect the SDK and forward its push events.
pub(super) fn spawn_connect(
    attempt: AttemptId,
    services: &Services,
    msg_tx: mpsc::Sender<Message>,
) {
    let auth = services.auth.clone();
    let connector = services.connector.clone();

    tokio::spawn(async move {
        if let Err(error) = auth.current_credential().await {
            let _ = msg_tx
                .send(Message::BridgeConnectFailed { attempt, error })
                .await;
            return;
        }

        let (events_tx, events_rx) = mpsc::channel::<BridgeEvent>(64);
        match connector.connect(events_tx).await {
            Ok(sdk) => {
                debug!("Streaming SDK connected for attempt {}", attempt);
                spawn_event_forwarder(attempt, events_rx, msg_tx.clone());
                let bridge = Arc::new(SignalingBridge::new(sdk));
                let _ = msg_tx
                    .send(Message::BridgeConnected { attempt, bridge })
                    .await;
            }
            Err(error) => {
                let _ = msg_tx
                    .send(Message::BridgeConnectFailed { attempt, error })
                    .await;
            }
        }
    });
}

/// Runs until the SDK drops its event sender or the engine goes away
fn spawn_event_forwarder(
    attempt: AttemptId,
    mut events: mpsc::Receiver<BridgeEvent>,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if msg_tx.send(Message::Bridge { attempt, event }).await.is_err() {
                break;
            }
        }
        debug!("Bridge event stream of attempt {} ended", attempt);
    });
}

/// Generate the local signal, then create the backend session.
///
/// The create call is not cancelled with its attempt: a session created for
/// an abandoned attempt is reported anyway so it can be terminated.
pub(super) fn spawn_create(
    attempt: AttemptId,
    bridge: Arc<SignalingBridge>,
    game: GameId,
    regions: Vec<String>,
    services: Services,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let local_signal = match bridge.generate_local_signal().await {
            Ok(signal) => signal,
            Err(error) => {
                let _ = msg_tx
                    .send(Message::SessionCreateFailed { attempt, error })
                    .await;
                return;
            }
        };

        let _ = msg_tx
            .send(Message::LocalSignalGenerated {
                attempt,
                signal: local_signal.clone(),
            })
            .await;

        let group_id = game.group_id.clone();
        let params = CreateSession {
            app_id: game.app_id,
            group_id: game.group_id,
            local_signal,
            regions,
        };

        let msg = match services.session_api.create_session(params).await {
            Ok(response) => Message::SessionCreated {
                attempt,
                group_id,
                response,
            },
            Err(error) => Message::SessionCreateFailed {
                attempt,
                error: as_create_failure(error),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// I/O errors count as network failures, anything else as a backend one
fn as_create_failure(error: Error) -> Error {
    match error {
        Error::SessionCreateFailed { .. } => error,
        Error::Io(e) => Error::create_failed(FailureKind::Network, e.to_string()),
        other => Error::create_failed(FailureKind::Api, other.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
pub(super) fn spawn_polling(
    attempt: AttemptId,
    group_id: String,
    arn: String,
    policy: PollPolicy,
    accept_signal_without_active: bool,
    api: Arc<dyn SessionApi>,
    cancel: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let progress_tx = msg_tx.clone();
        let outcome = poll_until_ready(
            api.as_ref(),
            &group_id,
            &arn,
            policy,
            accept_signal_without_active,
            cancel,
            |poll, response| {
                let _ = progress_tx.try_send(Message::PollProgress {
                    attempt,
                    poll,
                    response: response.clone(),
                });
            },
        )
        .await;

        let msg = match outcome {
            PollOutcome::Ready {
                region,
                remote_signal,
                attempts,
            } => {
                info!("Session {} ready after {} checks", arn, attempts);
                Message::SessionReady {
                    attempt,
                    region,
                    remote_signal,
                }
            }
            PollOutcome::Failed(error) => Message::PollFailed { attempt, error },
            PollOutcome::TimedOut { attempts, elapsed } => {
                warn!(
                    "Session {} not ready after {} checks in {:?}",
                    arn, attempts, elapsed
                );
                Message::PollFailed {
                    attempt,
                    error: Error::PollingTimedOut { attempts, elapsed },
                }
            }
            PollOutcome::Cancelled => {
                debug!("Poll loop for {} cancelled", arn);
                return;
            }
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_apply_remote_signal(
    attempt: AttemptId,
    bridge: Arc<SignalingBridge>,
    signal: String,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match bridge.consume_remote_signal(&signal).await {
            Ok(()) => Message::RemoteSignalApplied { attempt, signal },
            Err(error) => Message::RemoteSignalRejected { attempt, error },
        };
        let _ = msg_tx.send(msg).await;
    });
}

pub(super) fn spawn_update(
    attempt: AttemptId,
    group_id: String,
    arn: String,
    local_signal: String,
    api: Arc<dyn SessionApi>,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match api.update_session(&group_id, &arn, &local_signal).await {
            Ok(response) => Message::SessionUpdated {
                attempt,
                remote_signal: response.remote_signal().map(str::to_string),
            },
            Err(error) => Message::SessionUpdateFailed { attempt, error },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Close the bridge and terminate the backend session.
///
/// Terminate failures are logged and never escalated.
pub async fn teardown(
    api: &dyn SessionApi,
    group_id: &str,
    arn: Option<&str>,
    bridge: Option<Arc<SignalingBridge>>,
) {
    if let Some(bridge) = bridge {
        bridge.close().await;
    }

    if let Some(arn) = arn {
        match api.terminate_session(group_id, arn).await {
            Ok(()) => info!("Terminated session {}", arn),
            Err(e) => warn!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamecast_backend::test_utils::{FakeSdk, FakeSessionApi};

    #[tokio::test]
    async fn test_teardown_terminates_and_closes() {
        let api = FakeSessionApi::new();
        let sdk = Arc::new(FakeSdk::ready("offer"));
        let bridge = Arc::new(SignalingBridge::new(sdk.clone()));

        teardown(&api, "sg", Some("s1"), Some(bridge)).await;

        assert_eq!(api.terminated(), vec!["s1"]);
        assert_eq!(sdk.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_teardown_without_arn_skips_backend() {
        let api = FakeSessionApi::new();
        teardown(&api, "sg", None, None).await;
        assert_eq!(api.terminate_calls(), 0);
    }

    #[tokio::test]
    async fn test_teardown_swallows_terminate_failure() {
        let api = FakeSessionApi::new();
        api.fail_terminate();
        teardown(&api, "sg", Some("s1"), None).await;
        assert_eq!(api.terminate_calls(), 1);
    }

    #[test]
    fn test_create_failure_classification() {
        let network = as_create_failure(Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(matches!(
            network,
            Error::SessionCreateFailed {
                kind: FailureKind::Network,
                ..
            }
        ));

        let kept = as_create_failure(Error::create_failed(FailureKind::Api, "HTTP 400"));
        assert!(kept.to_string().contains("HTTP 400"));

        let other = as_create_failure(Error::SdkNotInitialized);
        assert!(matches!(
            other,
            Error::SessionCreateFailed {
                kind: FailureKind::Api,
                ..
            }
        ));
    }
}
