//! Seams to the streaming SDK.
//!
//! The SDK renders video and audio and owns the peer connection. The client
//! only drives its signaling: ask for an offer, hand back the answer, attach
//! input, close.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use gamecast_core::prelude::*;
use gamecast_core::BridgeEvent;

/// One live SDK instance, bound to a single session attempt
#[async_trait]
pub trait StreamingSdk: Send + Sync {
    /// Produce the local signaling payload (the offer).
    ///
    /// # Errors
    ///
    /// [`Error::SdkNotInitialized`] before the video/audio sinks exist.
    async fn generate_signal_request(&self) -> Result<String>;

    /// Apply the remote signaling payload (the answer).
    async fn process_signal_response(&self, payload: &str) -> Result<()>;

    /// Attach keyboard, mouse and gamepad input to the stream
    async fn attach_input(&self) -> Result<()>;

    /// Release the instance. Safe to call more than once.
    async fn close(&self);
}

/// Creates a fresh SDK instance for each session attempt
#[async_trait]
pub trait SdkConnector: Send + Sync {
    /// Connect to the SDK. Push events for this instance are delivered on
    /// `events` until it is closed.
    ///
    /// # Errors
    ///
    /// [`Error::WebView`] if the SDK host cannot be reached.
    async fn connect(&self, events: mpsc::Sender<BridgeEvent>) -> Result<Arc<dyn StreamingSdk>>;
}
