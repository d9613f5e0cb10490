//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the message channel, the collaborators, the per-attempt
//! cancellation scopes and the application state. Both runners feed it
//! messages and render (or serialize) what it produces.

use std::time::Duration;

use gamecast_core::{AttemptId, GameId, SessionStatus};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::actions::{self, AttemptScopes};
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::services::Services;
use crate::signals;
use crate::state::AppState;

/// Upper bound for the final teardown on shutdown
const SHUTDOWN_TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    status: Option<SessionStatus>,
    attempt: Option<AttemptId>,
    game: String,
    catalog_generation: u64,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            status: state.session.as_ref().map(|s| s.status),
            attempt: state.session.as_ref().map(|s| s.attempt),
            game: state
                .session
                .as_ref()
                .map(|s| s.game_name.clone())
                .unwrap_or_default(),
            catalog_generation: state.catalog.generation,
        }
    }
}

/// Orchestration engine for gamecast.
///
/// Encapsulates all state shared between the TUI and headless runners:
/// - TEA state management
/// - Message channel
/// - Backend, catalog and SDK collaborators
/// - Cancellation of per-attempt background work
/// - Event broadcasting for external consumers
pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin, tasks).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    services: Services,
    scopes: AttemptScopes,

    /// Event broadcaster for external consumers.
    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Create an engine with explicit collaborators.
    ///
    /// Must be called inside a tokio runtime: the OS signal handler is
    /// spawned here.
    pub fn new(settings: Settings, services: Services) -> Self {
        let state = AppState::with_settings(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        signals::spawn_signal_handler(msg_tx.clone());

        Self {
            state,
            msg_tx,
            msg_rx,
            services,
            scopes: AttemptScopes::new(),
            event_tx,
        }
    }

    /// Create an engine talking to the configured backend and web view
    pub fn from_settings(settings: Settings) -> gamecast_core::Result<Self> {
        let services = Services::from_settings(&settings)?;
        Ok(Self::new(settings, services))
    }

    /// Load the catalog and, if `play` is set, start that game right away
    pub fn start(&mut self, play: Option<GameId>) {
        self.process_message(Message::FetchCatalog);
        if let Some(game) = play {
            self.process_message(Message::StartSession {
                game,
                regions: None,
            });
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle and emit
    /// EngineEvents for what changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.services,
            &self.scopes,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Stop background work and tear down a live session.
    ///
    /// A teardown already in flight is awaited; otherwise the session is torn
    /// down here. A create still in flight is awaited first so the session it
    /// produces is terminated too. Either way the backend session is
    /// terminated at most once.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
        self.scopes.cancel_all();

        let Some(status) = self.state.session_status() else {
            return;
        };
        let pre = StateSnapshot::capture(&self.state);
        let deadline = tokio::time::Instant::now() + SHUTDOWN_TEARDOWN_TIMEOUT;

        if status == SessionStatus::CreatingSession {
            self.await_create(deadline).await;
        }

        if status == SessionStatus::Ending {
            self.await_teardown(deadline).await;
        } else if let Some(session) = self.state.session.as_mut() {
            info!("Tearing down session {} on shutdown", session.attempt);
            session.status = SessionStatus::Ending;
            let (arn, bridge) = session.take_teardown();
            let group_id = session.id.group_id.clone();

            let teardown = actions::session::teardown(
                self.services.session_api.as_ref(),
                &group_id,
                arn.as_deref(),
                bridge,
            );
            if tokio::time::timeout_at(deadline, teardown).await.is_err()
            {
                warn!("Session teardown timed out");
            }
        }

        self.state.session = None;
        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Wait for the live attempt's create call and record the arn it returns.
    ///
    /// Other messages are dropped: nothing new starts during shutdown.
    async fn await_create(&mut self, deadline: tokio::time::Instant) {
        let Some(attempt) = self.state.session.as_ref().map(|s| s.attempt) else {
            return;
        };
        loop {
            match tokio::time::timeout_at(deadline, self.msg_rx.recv()).await {
                Ok(Some(Message::SessionCreated {
                    attempt: created,
                    response,
                    ..
                })) if created == attempt => {
                    if let Some(session) = self.state.session.as_mut() {
                        info!("Session {} created during shutdown", response.arn);
                        session.arn = response.arn;
                    }
                    return;
                }
                Ok(Some(Message::SessionCreateFailed {
                    attempt: failed, ..
                })) if failed == attempt => return,
                Ok(Some(_)) => {}
                Ok(None) => return,
                Err(_) => {
                    warn!("Session creation did not finish before shutdown");
                    return;
                }
            }
        }
    }

    /// Keep processing messages until the running teardown reports back
    async fn await_teardown(&mut self, deadline: tokio::time::Instant) {
        while self.state.session.is_some() {
            match tokio::time::timeout_at(deadline, self.msg_rx.recv()).await {
                Ok(Some(msg)) => self.process_message(msg),
                Ok(None) => break,
                Err(_) => {
                    warn!("Session teardown timed out");
                    break;
                }
            }
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.catalog_generation != post.catalog_generation {
            self.emit(EngineEvent::CatalogLoaded {
                count: self.state.catalog.games.len(),
                offline: self.state.catalog.offline,
                error: self.state.catalog.error.clone(),
            });
        }

        if pre.attempt == post.attempt && pre.status == post.status {
            return;
        }

        let same_attempt = pre.attempt == post.attempt;
        if pre.status.is_some() && !same_attempt {
            self.emit(EngineEvent::SessionEnded {
                game: pre.game.clone(),
            });
        }

        let Some(new) = post.status else {
            return;
        };
        self.emit(EngineEvent::StatusChanged {
            game: post.game.clone(),
            old: if same_attempt { pre.status } else { None },
            new,
        });

        let Some(view) = self.state.session_view() else {
            return;
        };
        match new {
            SessionStatus::Active => self.emit(EngineEvent::SessionReady {
                game: view.game_name,
                region: view.region,
            }),
            SessionStatus::Error => self.emit(EngineEvent::SessionError {
                game: view.game_name,
                message: view.error_text.unwrap_or_default(),
            }),
            _ => {}
        }
    }

    /// send() returns Err only if there are no receivers, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
