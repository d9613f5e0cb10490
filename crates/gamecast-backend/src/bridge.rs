//! Signaling bridge between the streaming SDK and the session API.
//!
//! One bridge per session attempt. It produces the local signal that goes
//! into `create_session`/`update_session` and applies the remote signal the
//! backend hands back.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gamecast_core::prelude::*;

use crate::sdk::StreamingSdk;

pub struct SignalingBridge {
    sdk: Arc<dyn StreamingSdk>,
    closed: AtomicBool,
}

impl fmt::Debug for SignalingBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalingBridge")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl SignalingBridge {
    pub fn new(sdk: Arc<dyn StreamingSdk>) -> Self {
        Self {
            sdk,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Ask the SDK for a local signaling payload.
    ///
    /// # Errors
    ///
    /// [`Error::SdkNotInitialized`] if the SDK has no video/audio sinks yet
    /// or the bridge is closed.
    pub async fn generate_local_signal(&self) -> Result<String> {
        if self.is_closed() {
            return Err(Error::SdkNotInitialized);
        }

        let signal = self.sdk.generate_signal_request().await?;
        if signal.trim().is_empty() {
            return Err(Error::webview("SDK produced an empty signal request"));
        }
        debug!("Generated local signal ({} bytes)", signal.len());
        Ok(signal)
    }

    /// Apply the remote signal, then attach input devices.
    ///
    /// The stream is not interactive until both steps succeed.
    ///
    /// # Errors
    ///
    /// [`Error::SignalRejected`] for an empty payload, a failed negotiation
    /// or a failed input attach.
    pub async fn consume_remote_signal(&self, payload: &str) -> Result<()> {
        if payload.trim().is_empty() {
            return Err(Error::signal_rejected("empty remote signal"));
        }
        if self.is_closed() {
            return Err(Error::signal_rejected("bridge already closed"));
        }

        self.sdk
            .process_signal_response(payload)
            .await
            .map_err(|e| match e {
                Error::SignalRejected { .. } => e,
                other => Error::signal_rejected(other.to_string()),
            })?;

        self.sdk
            .attach_input()
            .await
            .map_err(|e| Error::signal_rejected(format!("failed to attach input: {e}")))?;

        info!("Remote signal applied, input attached");
        Ok(())
    }

    /// Release the SDK. Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.sdk.close().await;
    }
}
