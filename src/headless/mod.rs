//! Headless mode - NDJSON event output instead of the TUI
//!
//! Engine events are written to stdout as newline-delimited JSON, one event
//! per line, tagged by an `"event"` field. Commands are read from stdin.
//!
//! # Example Output
//!
//! ```json
//! {"event":"catalog_loaded","count":12,"offline":false,"error":null,"timestamp":1704700001000}
//! {"event":"status_changed","game":"Racer","old":null,"new":"Initializing","timestamp":1704700002000}
//! {"event":"session_ready","game":"Racer","region":"eu-west-1","timestamp":1704700009000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use gamecast_app::EngineEvent;
use serde::Serialize;
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// A catalog fetch finished
    CatalogLoaded {
        count: usize,
        offline: bool,
        error: Option<String>,
        timestamp: i64,
    },

    /// The session moved to a new state
    StatusChanged {
        game: String,
        old: Option<String>,
        new: String,
        timestamp: i64,
    },

    /// The stream is up
    SessionReady {
        game: String,
        region: String,
        timestamp: i64,
    },

    /// The session failed; `retry` or `exit` next
    SessionError {
        game: String,
        message: String,
        timestamp: i64,
    },

    /// The session was torn down
    SessionEnded { game: String, timestamp: i64 },

    /// A stdin command could not be understood
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    /// Map an engine event; `None` for events with no NDJSON counterpart
    pub fn from_engine(event: &EngineEvent) -> Option<Self> {
        let timestamp = Self::now();
        let event = match event {
            EngineEvent::CatalogLoaded {
                count,
                offline,
                error,
            } => Self::CatalogLoaded {
                count: *count,
                offline: *offline,
                error: error.clone(),
                timestamp,
            },
            EngineEvent::StatusChanged { game, old, new } => Self::StatusChanged {
                game: game.clone(),
                old: old.map(|s| s.to_string()),
                new: new.to_string(),
                timestamp,
            },
            EngineEvent::SessionReady { game, region } => Self::SessionReady {
                game: game.clone(),
                region: region.clone(),
                timestamp,
            },
            EngineEvent::SessionError { game, message } => Self::SessionError {
                game: game.clone(),
                message: message.clone(),
                timestamp,
            },
            EngineEvent::SessionEnded { game } => Self::SessionEnded {
                game: game.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => return None,
        };
        Some(event)
    }
}
