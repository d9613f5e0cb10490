//! Messages exchanged with the embedded web view and the events the
//! signaling bridge derives from them

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────
// Web View Wire Protocol
// ─────────────────────────────────────────────────────────

/// Inbound frame from the web view hosting the streaming SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebViewMessage {
    HtmlLoaded,
    /// Video/audio sinks exist; the SDK can now generate signals
    DomLoaded,
    SignalRequest {
        payload: String,
    },
    StreamReady,
    StreamError {
        reason: String,
    },
    SessionEnded,
    ServerDisconnect {
        reason: String,
    },
    ConnectionState {
        state: String,
    },
    BackButtonPressed,
    StatusUpdate {
        message: String,
    },
}

impl WebViewMessage {
    /// Parse one JSON text frame
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Outbound frame sent to the web view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebViewCommand {
    GenerateSignalRequest,
    ProcessSignalResponse { payload: String },
    AttachInput,
    Close,
}

impl WebViewCommand {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ─────────────────────────────────────────────────────────
// Connection State
// ─────────────────────────────────────────────────────────

/// Peer connection state as reported by the SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
    Other(String),
}

impl ConnectionState {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => ConnectionState::New,
            "connecting" => ConnectionState::Connecting,
            "connected" => ConnectionState::Connected,
            "disconnected" => ConnectionState::Disconnected,
            "failed" => ConnectionState::Failed,
            "closed" => ConnectionState::Closed,
            _ => ConnectionState::Other(s.to_string()),
        }
    }

    /// The stream cannot recover from this state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectionState::Disconnected | ConnectionState::Failed | ConnectionState::Closed
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::New => "new",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Failed => "failed",
            ConnectionState::Closed => "closed",
            ConnectionState::Other(s) => s,
        };
        f.write_str(s)
    }
}

/// Server disconnect reasons that end the session
const TERMINAL_DISCONNECT_REASONS: &[&str] =
    &["terminated", "idle", "timeout", "expired", "evicted", "error"];

/// Check whether a `serverDisconnect` reason code ends the session
pub fn is_terminal_disconnect_reason(reason: &str) -> bool {
    let reason = reason.trim();
    TERMINAL_DISCONNECT_REASONS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(reason))
}

// ─────────────────────────────────────────────────────────
// Bridge Events
// ─────────────────────────────────────────────────────────

/// Push event from the signaling bridge to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    ConnectionStateChanged(ConnectionState),
    ChannelError(String),
    ServerDisconnected(String),
    BackRequested,
    SessionEnded,
    StatusUpdate(String),
    /// The SDK produced a new signal request without being asked
    RenegotiationRequested(String),
}

impl BridgeEvent {
    /// True if this event means the remote stream is gone
    pub fn ends_session(&self) -> bool {
        match self {
            BridgeEvent::ConnectionStateChanged(state) => state.is_terminal(),
            BridgeEvent::ServerDisconnected(reason) => is_terminal_disconnect_reason(reason),
            BridgeEvent::SessionEnded => true,
            _ => false,
        }
    }
}
