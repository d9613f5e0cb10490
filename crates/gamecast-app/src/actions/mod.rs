//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gamecast_core::AttemptId;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::config::SessionSettings;
use crate::handler::UpdateAction;
use crate::message::Message;
use crate::services::Services;

pub mod catalog;
pub mod polling;
pub mod session;

pub use polling::{poll_until_ready, PollOutcome};

/// Cancellation flags for the background work of each session attempt.
///
/// Tasks hold a `watch::Receiver` for their attempt; teardown sets the flag,
/// which stops the poll loop and any wait it is in.
#[derive(Debug, Clone, Default)]
pub struct AttemptScopes {
    scopes: Arc<Mutex<HashMap<AttemptId, watch::Sender<bool>>>>,
}

impl AttemptScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver for `attempt`, creating its scope on first use
    pub fn token(&self, attempt: AttemptId) -> watch::Receiver<bool> {
        match self.scopes.lock() {
            Ok(mut scopes) => scopes
                .entry(attempt)
                .or_insert_with(|| watch::channel(false).0)
                .subscribe(),
            Err(_) => {
                warn!("Attempt scope registry poisoned; task for {} starts cancelled", attempt);
                watch::channel(true).1
            }
        }
    }

    /// Cancel everything running for `attempt`
    pub fn cancel(&self, attempt: AttemptId) {
        if let Ok(mut scopes) = self.scopes.lock() {
            if let Some(tx) = scopes.remove(&attempt) {
                debug!("Cancelling background work of attempt {}", attempt);
                let _ = tx.send(true);
            }
        }
    }

    pub fn cancel_all(&self) {
        if let Ok(mut scopes) = self.scopes.lock() {
            for (_, tx) in scopes.drain() {
                let _ = tx.send(true);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Execute an action by spawning a background task
pub fn handle_action(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    services: &Services,
    scopes: &AttemptScopes,
    settings: &SessionSettings,
) {
    match action {
        UpdateAction::FetchCatalog => {
            catalog::spawn_fetch(services.catalog.clone(), msg_tx);
        }

        UpdateAction::ConnectBridge { attempt } => {
            session::spawn_connect(attempt, services, msg_tx);
        }

        UpdateAction::CreateSession {
            attempt,
            bridge,
            game,
            regions,
        } => {
            session::spawn_create(
                attempt,
                bridge,
                game,
                regions,
                services.clone(),
                msg_tx,
            );
        }

        UpdateAction::StartPolling {
            attempt,
            group_id,
            arn,
        } => {
            session::spawn_polling(
                attempt,
                group_id,
                arn,
                settings.poll_policy(),
                settings.accept_signal_without_active,
                services.session_api.clone(),
                scopes.token(attempt),
                msg_tx,
            );
        }

        UpdateAction::CancelPolling { attempt } => {
            scopes.cancel(attempt);
        }

        UpdateAction::ApplyRemoteSignal {
            attempt,
            bridge,
            signal,
        } => {
            session::spawn_apply_remote_signal(attempt, bridge, signal, msg_tx);
        }

        UpdateAction::UpdateSession {
            attempt,
            group_id,
            arn,
            local_signal,
        } => {
            session::spawn_update(
                attempt,
                group_id,
                arn,
                local_signal,
                services.session_api.clone(),
                msg_tx,
            );
        }

        UpdateAction::TeardownSession {
            attempt,
            group_id,
            arn,
            bridge,
        } => {
            scopes.cancel(attempt);
            let api = services.session_api.clone();
            tokio::spawn(async move {
                session::teardown(api.as_ref(), &group_id, arn.as_deref(), bridge).await;
                let _ = msg_tx.send(Message::SessionTornDown { attempt }).await;
            });
        }
    }
}
