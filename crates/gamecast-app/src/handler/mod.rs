//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `catalog`: Catalog loading and selection
//! - `session_lifecycle`: Session state machine (start, create, poll, teardown)
//! - `bridge_events`: Streaming SDK push events
//! - `keys`: Key event handlers for UI modes

pub(crate) mod bridge_events;
pub(crate) mod catalog;
pub(crate) mod keys;
pub(crate) mod session_lifecycle;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use gamecast_backend::SignalingBridge;
use gamecast_core::{AttemptId, GameId};

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch the game list in the background
    FetchCatalog,

    /// Check the credential and connect the per-attempt streaming SDK
    ConnectBridge { attempt: AttemptId },

    /// Generate the local signal, then call `create_session`
    CreateSession {
        attempt: AttemptId,
        bridge: Arc<SignalingBridge>,
        game: GameId,
        regions: Vec<String>,
    },

    /// Run the readiness poll loop for a created session
    StartPolling {
        attempt: AttemptId,
        group_id: String,
        arn: String,
    },

    /// Stop the poll loop of an attempt that failed for another reason
    CancelPolling { attempt: AttemptId },

    /// Hand the remote signal to the SDK and attach input
    ApplyRemoteSignal {
        attempt: AttemptId,
        bridge: Arc<SignalingBridge>,
        signal: String,
    },

    /// Send a regenerated local signal for an existing session
    UpdateSession {
        attempt: AttemptId,
        group_id: String,
        arn: String,
        local_signal: String,
    },

    /// Cancel background work, close the bridge and terminate the backend
    /// session. `arn` is `None` when there is nothing to terminate.
    TeardownSession {
        attempt: AttemptId,
        group_id: String,
        arn: Option<String>,
        bridge: Option<Arc<SignalingBridge>>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
