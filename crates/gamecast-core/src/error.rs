//! Application error types with rich context

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a backend call failed, as far as the user is concerned.
///
/// Connectivity problems and backend rejections get different messages so
/// the player knows whether to check their network or try again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced an HTTP response (DNS, connect, timeout)
    Network,
    /// The backend answered with a non-success status or an unreadable body
    Api,
}

impl FailureKind {
    pub fn headline(&self) -> &'static str {
        match self {
            FailureKind::Network => "Network error while starting the session",
            FailureKind::Api => "The streaming service could not start the session",
        }
    }
}

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    // ─────────────────────────────────────────────────────────────
    // Auth Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Not signed in: {reason}")]
    Unauthenticated { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Backend API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Game catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    #[error("{}: {message}", .kind.headline())]
    SessionCreateFailed { kind: FailureKind, message: String },

    #[error("Failed to check session status: {message}")]
    StatusCheckFailed { message: String },

    #[error("Failed to renegotiate the stream: {message}")]
    SessionUpdateFailed { message: String },

    #[error("Failed to terminate session: {message}")]
    TerminateFailed { message: String },

    #[error(
        "Timed out waiting for the session to become ready ({attempts} status checks in {}s)",
        .elapsed.as_secs()
    )]
    PollingTimedOut { attempts: u32, elapsed: Duration },

    // ─────────────────────────────────────────────────────────────
    // Streaming SDK / Web View Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Streaming SDK is not initialized (video/audio not ready)")]
    SdkNotInitialized,

    #[error("Stream negotiation rejected: {reason}")]
    SignalRejected { reason: String },

    #[error("Web view error: {message}")]
    WebView { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            message: message.into(),
        }
    }

    pub fn create_failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::SessionCreateFailed {
            kind,
            message: message.into(),
        }
    }

    pub fn status_check_failed(message: impl Into<String>) -> Self {
        Self::StatusCheckFailed {
            message: message.into(),
        }
    }

    pub fn update_failed(message: impl Into<String>) -> Self {
        Self::SessionUpdateFailed {
            message: message.into(),
        }
    }

    pub fn terminate_failed(message: impl Into<String>) -> Self {
        Self::TerminateFailed {
            message: message.into(),
        }
    }

    pub fn signal_rejected(reason: impl Into<String>) -> Self {
        Self::SignalRejected {
            reason: reason.into(),
        }
    }

    pub fn webview(message: impl Into<String>) -> Self {
        Self::WebView {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// True for the two timeout-style outcomes the shell offers a retry for
    /// without suggesting anything is broken locally.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::PollingTimedOut { .. })
    }

    /// True when the failure came from a connectivity problem
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::SessionCreateFailed {
                kind: FailureKind::Network,
                ..
            }
        )
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::CatalogUnavailable { .. }
                | Error::SessionCreateFailed { .. }
                | Error::StatusCheckFailed { .. }
                | Error::SessionUpdateFailed { .. }
                | Error::TerminateFailed { .. }
                | Error::PollingTimedOut { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::TerminalInit(_) | Error::ConfigInvalid { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
