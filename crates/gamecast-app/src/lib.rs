//! gamecast-app - Application state and session orchestration for gamecast
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management. The session lifecycle state machine lives in
//! [`handler::session_lifecycle`]; its background work (SDK connection,
//! session creation, the readiness poll loop, teardown) lives in [`actions`].
//! The [`Engine`] ties both together for the TUI and headless runners.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod services;
pub mod session;
pub mod signals;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use services::Services;
pub use session::Session;
pub use state::{AppState, CatalogState, SessionView, UiMode};
