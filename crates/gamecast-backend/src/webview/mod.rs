//! Streaming SDK hosted in an embedded web view.
//!
//! [`WebViewSdk`] turns the web view's asynchronous message stream into
//! request/response calls:
//!
//! - `generateSignalRequest` is answered by the next `signalRequest`
//! - `processSignalResponse` is answered by `streamReady` or `streamError`
//!
//! Everything else, including a `signalRequest` nobody asked for, becomes a
//! [`BridgeEvent`].

pub mod client;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};

use gamecast_core::prelude::*;
use gamecast_core::{BridgeEvent, ConnectionState, WebViewCommand, WebViewMessage};

use crate::sdk::{SdkConnector, StreamingSdk};

pub use client::WebViewClient;

type StreamResult = std::result::Result<(), String>;

/// State shared between the SDK handle and its router task
struct Shared {
    ready: watch::Sender<bool>,
    pending_signal: Mutex<Option<oneshot::Sender<String>>>,
    pending_stream: Mutex<Option<oneshot::Sender<StreamResult>>>,
    closed: AtomicBool,
}

impl Shared {
    fn take_pending_signal(&self) -> Option<oneshot::Sender<String>> {
        self.pending_signal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    fn take_pending_stream(&self) -> Option<oneshot::Sender<StreamResult>> {
        self.pending_stream
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

/// [`StreamingSdk`] backed by a web-view connection
pub struct WebViewSdk {
    commands: mpsc::Sender<WebViewCommand>,
    shared: Arc<Shared>,
    signal_timeout: Duration,
}

impl WebViewSdk {
    /// Wrap an open connection and start routing its messages
    pub fn new(
        commands: mpsc::Sender<WebViewCommand>,
        messages: mpsc::Receiver<WebViewMessage>,
        events: mpsc::Sender<BridgeEvent>,
        signal_timeout: Duration,
    ) -> Self {
        let (ready, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            ready,
            pending_signal: Mutex::new(None),
            pending_stream: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        tokio::spawn(run_router(messages, Arc::clone(&shared), events));

        Self {
            commands,
            shared,
            signal_timeout,
        }
    }

    /// True once the web view has reported `domLoaded`
    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Wait up to `timeout` for `domLoaded`. Returns whether it arrived.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let mut rx = self.shared.ready.subscribe();
        let outcome = tokio::time::timeout(timeout, rx.wait_for(|ready| *ready)).await;
        matches!(outcome, Ok(Ok(_)))
    }

    async fn send(&self, command: WebViewCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::webview("web view connection closed"))
    }
}

#[async_trait]
impl StreamingSdk for WebViewSdk {
    async fn generate_signal_request(&self) -> Result<String> {
        if self.shared.closed.load(Ordering::SeqCst) || !self.is_ready() {
            return Err(Error::SdkNotInitialized);
        }

        let (tx, rx) = oneshot::channel();
        *self
            .shared
            .pending_signal
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(tx);

        self.send(WebViewCommand::GenerateSignalRequest).await?;

        match tokio::time::timeout(self.signal_timeout, rx).await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(_)) => Err(Error::webview("web view closed before sending a signal")),
            Err(_) => {
                self.shared.take_pending_signal();
                Err(Error::webview(format!(
                    "no signal request from the web view within {}ms",
                    self.signal_timeout.as_millis()
                )))
            }
        }
    }

    async fn process_signal_response(&self, payload: &str) -> Result<()> {
        if self.shared.closed.load(Ordering::SeqCst) {
            return Err(Error::SdkNotInitialized);
        }

        let (tx, rx) = oneshot::channel();
        *self
            .shared
            .pending_stream
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(tx);

        self.send(WebViewCommand::ProcessSignalResponse {
            payload: payload.to_string(),
        })
        .await?;

        match tokio::time::timeout(self.signal_timeout, rx).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(reason))) => Err(Error::signal_rejected(reason)),
            Ok(Err(_)) => Err(Error::signal_rejected("web view closed during negotiation")),
            Err(_) => {
                self.shared.take_pending_stream();
                Err(Error::signal_rejected(format!(
                    "stream did not start within {}ms",
                    self.signal_timeout.as_millis()
                )))
            }
        }
    }

    async fn attach_input(&self) -> Result<()> {
        self.send(WebViewCommand::AttachInput).await
    }

    async fn close(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Closing web view SDK");
        let _ = self.commands.send(WebViewCommand::Close).await;
    }
}

/// Route inbound web-view messages to pending calls or bridge events
async fn run_router(
    mut messages: mpsc::Receiver<WebViewMessage>,
    shared: Arc<Shared>,
    events: mpsc::Sender<BridgeEvent>,
) {
    while let Some(message) = messages.recv().await {
        let event = match message {
            WebViewMessage::HtmlLoaded => {
                debug!("Web view: HTML loaded");
                None
            }
            WebViewMessage::DomLoaded => {
                info!("Web view: DOM loaded, SDK ready");
                shared.ready.send_replace(true);
                None
            }
            WebViewMessage::SignalRequest { payload } => match shared.take_pending_signal() {
                Some(tx) => {
                    let _ = tx.send(payload);
                    None
                }
                None => Some(BridgeEvent::RenegotiationRequested(payload)),
            },
            WebViewMessage::StreamReady => {
                match shared.take_pending_stream() {
                    Some(tx) => {
                        let _ = tx.send(Ok(()));
                    }
                    None => debug!("Web view: streamReady with no pending negotiation"),
                }
                None
            }
            WebViewMessage::StreamError { reason } => match shared.take_pending_stream() {
                Some(tx) => {
                    let _ = tx.send(Err(reason));
                    None
                }
                None => Some(BridgeEvent::ChannelError(reason)),
            },
            WebViewMessage::SessionEnded => Some(BridgeEvent::SessionEnded),
            WebViewMessage::ServerDisconnect { reason } => {
                Some(BridgeEvent::ServerDisconnected(reason))
            }
            WebViewMessage::ConnectionState { state } => Some(
                BridgeEvent::ConnectionStateChanged(ConnectionState::parse(&state)),
            ),
            WebViewMessage::BackButtonPressed => Some(BridgeEvent::BackRequested),
            WebViewMessage::StatusUpdate { message } => Some(BridgeEvent::StatusUpdate(message)),
        };

        if let Some(event) = event {
            if events.send(event).await.is_err() {
                debug!("Web view: bridge event receiver dropped");
            }
        }
    }

    // Wake any caller still waiting on a reply
    shared.take_pending_signal();
    shared.take_pending_stream();

    if !shared.closed.load(Ordering::SeqCst) {
        warn!("Web view connection lost");
        let _ = events
            .send(BridgeEvent::ConnectionStateChanged(ConnectionState::Closed))
            .await;
    }
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Opens a new web-view connection per session attempt
#[derive(Debug, Clone)]
pub struct WebViewConnector {
    endpoint: String,
    connect_timeout: Duration,
    signal_timeout: Duration,
}

impl WebViewConnector {
    pub fn new(
        endpoint: impl Into<String>,
        connect_timeout: Duration,
        signal_timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout,
            signal_timeout,
        }
    }
}

#[async_trait]
impl SdkConnector for WebViewConnector {
    async fn connect(&self, events: mpsc::Sender<BridgeEvent>) -> Result<Arc<dyn StreamingSdk>> {
        let client = WebViewClient::connect(&self.endpoint, self.connect_timeout).await?;
        let sdk = WebViewSdk::new(client.commands, client.messages, events, self.signal_timeout);

        // Not fatal here: generating a signal reports SdkNotInitialized
        if !sdk.wait_ready(self.connect_timeout).await {
            warn!(
                "Web view did not report domLoaded within {}ms",
                self.connect_timeout.as_millis()
            );
        }

        Ok(Arc::new(sdk))
    }
}
