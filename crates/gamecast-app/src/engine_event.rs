//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use gamecast_core::SessionStatus;

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────
    /// A catalog fetch finished; `error` is set when it failed
    CatalogLoaded {
        count: usize,
        offline: bool,
        error: Option<String>,
    },

    // ─────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────
    /// The session moved to a new state
    StatusChanged {
        game: String,
        old: Option<SessionStatus>,
        new: SessionStatus,
    },

    /// The stream is up and interactive
    SessionReady { game: String, region: String },

    /// The session entered the error state
    SessionError { game: String, message: String },

    /// The session was torn down and dropped
    SessionEnded { game: String },

    /// The engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Event type name for logging/filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::CatalogLoaded { .. } => "catalog_loaded",
            EngineEvent::StatusChanged { .. } => "status_changed",
            EngineEvent::SessionReady { .. } => "session_ready",
            EngineEvent::SessionError { .. } => "session_error",
            EngineEvent::SessionEnded { .. } => "session_ended",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}
