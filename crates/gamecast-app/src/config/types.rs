//! Configuration types for gamecast
//!
//! Defines `Settings` (the `config.toml` file) and its sections.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gamecast_core::Game;

/// Lower bound for the poll interval
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

/// Application settings (`config.toml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub webview: WebViewSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Backend REST API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Applies to every request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

/// Where the bearer token comes from. The first configured source wins:
/// `token`, then `token_env`, then `token_file`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,

    #[serde(default)]
    pub user_id: String,
}

/// Session establishment policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Treat a non-empty remote signal as ready even without `ACTIVE`
    #[serde(default = "default_true")]
    pub accept_signal_without_active: bool,

    /// Ask before leaving an active session
    #[serde(default = "default_true")]
    pub confirm_exit: bool,

    #[serde(default)]
    pub default_regions: Vec<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            poll_timeout_secs: default_poll_timeout_secs(),
            accept_signal_without_active: true,
            confirm_exit: true,
            default_regions: Vec::new(),
        }
    }
}

impl SessionSettings {
    /// Effective polling bounds, with out-of-range values clamped
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS)),
            max_attempts: self.max_poll_attempts.max(1),
            timeout: Duration::from_secs(self.poll_timeout_secs.max(1)),
        }
    }
}

/// Bounds of the readiness poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        SessionSettings::default().poll_policy()
    }
}

/// Embedded web view hosting the streaming SDK
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebViewSettings {
    #[serde(default = "default_webview_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Upper bound on each signaling round trip through the web view
    #[serde(default = "default_signal_timeout_ms")]
    pub signal_timeout_ms: u64,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            endpoint: default_webview_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            signal_timeout_ms: default_signal_timeout_ms(),
        }
    }
}

impl WebViewSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    pub fn signal_timeout(&self) -> Duration {
        Duration::from_millis(self.signal_timeout_ms.max(1))
    }
}

/// Catalog behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Games shown when the catalog cannot be fetched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<Game>,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_max_poll_attempts() -> u32 {
    10
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn default_webview_endpoint() -> String {
    "ws://127.0.0.1:9223/bridge".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_signal_timeout_ms() -> u64 {
    15_000
}
