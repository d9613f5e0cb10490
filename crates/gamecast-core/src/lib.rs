//! # gamecast-core - Core Domain Types
//!
//! Foundation crate for gamecast. Provides domain types, error handling,
//! the web-view message protocol and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Game`], [`GameId`] - Catalog entries and the identifier pair that routes API calls
//! - [`sort_games()`] - Catalog ordering (by `ordering`, then `name`)
//! - [`SessionStatus`] - Play session lifecycle state
//! - [`RemoteStatus`] - Session status string as reported by the backend
//! - [`Credential`] - Bearer token and user id
//! - [`AttemptId`] - Monotonic session attempt identifier
//!
//! ### Events (`events`)
//! - [`WebViewMessage`], [`WebViewCommand`] - JSON frames exchanged with the web view
//! - [`BridgeEvent`] - Push events from the signaling bridge
//! - [`ConnectionState`] - Peer connection state
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`FailureKind`] - Network vs backend failure of a session call
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use gamecast_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, FailureKind, Result, ResultExt};
pub use events::{
    is_terminal_disconnect_reason, BridgeEvent, ConnectionState, WebViewCommand, WebViewMessage,
};
pub use types::{
    null_as_default, sort_games, AttemptId, Credential, Game, GameId, RemoteStatus, SessionStatus,
};
