//! # gamecast-backend - Backend, Auth and Streaming SDK Access
//!
//! Everything that talks to the outside world:
//!
//! - [`auth`] - credential providers (static token, environment, token file)
//! - [`catalog`] - `GET /games` and catalog ordering
//! - [`session_api`] - create / status / update / terminate over REST
//! - [`webview`] - WebSocket connection to the web view hosting the SDK
//! - [`bridge`] - the per-attempt [`SignalingBridge`]
//!
//! Collaborators are traits ([`AuthProvider`], [`CatalogSource`],
//! [`SessionApi`], [`SdkConnector`]) so the application core can run
//! against in-memory fakes. The fakes live in [`test_utils`] behind the
//! `test-helpers` feature.

pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod http;
pub mod protocol;
pub mod sdk;
pub mod session_api;
pub mod webview;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use auth::{
    AuthProvider, EnvTokenProvider, FileTokenProvider, NoCredentials, StaticTokenProvider,
};
pub use bridge::SignalingBridge;
pub use catalog::{CatalogSource, HttpCatalog};
pub use http::HttpBackend;
pub use protocol::{CreateSessionResponse, SessionStatusResponse, UpdateSessionResponse};
pub use sdk::{SdkConnector, StreamingSdk};
pub use session_api::{CreateSession, HttpSessionApi, SessionApi};
pub use webview::{WebViewConnector, WebViewSdk};
