//! WebSocket connection to the web view hosting the streaming SDK.
//!
//! The web view page opens a local WebSocket endpoint and exchanges JSON
//! frames: [`WebViewCommand`]s go out, [`WebViewMessage`]s come in.
//!
//! ```text
//! ┌──────────────────┐   cmd chan   ┌───────────────────────┐   ws   ┌──────────┐
//! │  WebViewClient   │ ───────────▶ │  Background I/O task  │ ◀────▶ │ web view │
//! │                  │ ◀─────────── │  parse / serialize    │        └──────────┘
//! └──────────────────┘   msg chan   └───────────────────────┘
//! ```
//!
//! There is no reconnection: a connection belongs to a single session
//! attempt, and losing it ends the stream.

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use gamecast_core::prelude::*;
use gamecast_core::{WebViewCommand, WebViewMessage};

use crate::http::truncate;

/// Characters of an unrecognized frame kept in the log
const FRAME_PREVIEW_CHARS: usize = 120;

/// Capacity of the outbound command channel
const CMD_CHANNEL_CAPACITY: usize = 16;

/// Capacity of the inbound message channel
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Both ends of an open web-view connection
pub struct WebViewClient {
    /// Send commands to the web view
    pub commands: mpsc::Sender<WebViewCommand>,
    /// Messages from the web view; closes when the connection drops
    pub messages: mpsc::Receiver<WebViewMessage>,
}

impl WebViewClient {
    /// Connect to the web view's WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// [`Error::WebView`] if the connection cannot be established within
    /// `timeout`.
    pub async fn connect(endpoint: &str, timeout: Duration) -> Result<Self> {
        info!("Connecting to web view at {}", endpoint);

        let ws_stream = match tokio::time::timeout(timeout, connect_async(endpoint)).await {
            Ok(Ok((ws_stream, _response))) => ws_stream,
            Ok(Err(e)) => {
                return Err(Error::webview(format!(
                    "failed to connect to {endpoint}: {e}"
                )))
            }
            Err(_) => {
                return Err(Error::webview(format!(
                    "timed out connecting to {endpoint} after {}ms",
                    timeout.as_millis()
                )))
            }
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);

        tokio::spawn(run_io_loop(ws_stream, cmd_rx, msg_tx));

        Ok(Self {
            commands: cmd_tx,
            messages: msg_rx,
        })
    }
}

/// Read/write loop for one connection.
///
/// Exits when the socket closes, after sending [`WebViewCommand::Close`],
/// or when every command sender is dropped.
async fn run_io_loop(
    ws_stream: WsStream,
    mut cmd_rx: mpsc::Receiver<WebViewCommand>,
    msg_tx: mpsc::Sender<WebViewMessage>,
) {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        forward_text(text.as_str(), &msg_tx).await;
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Web view: received Close frame");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Web view: WebSocket read error: {}", e);
                        break;
                    }
                    None => {
                        debug!("Web view: WebSocket stream ended");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(command) => {
                        let closing = command == WebViewCommand::Close;
                        if let Err(e) = send_command(&mut ws_sink, &command).await {
                            warn!("Web view: failed to send {:?}: {}", command, e);
                            break;
                        }
                        if closing {
                            send_close(&mut ws_sink).await;
                            break;
                        }
                    }
                    None => {
                        debug!("Web view: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        break;
                    }
                }
            }
        }
    }

    debug!("Web view I/O task exiting");
}

async fn forward_text(text: &str, msg_tx: &mpsc::Sender<WebViewMessage>) {
    match WebViewMessage::parse(text) {
        Ok(message) => {
            trace!("Web view → {:?}", message);
            if msg_tx.send(message).await.is_err() {
                debug!("Web view: message receiver dropped");
            }
        }
        Err(e) => {
            warn!(
                "Web view: ignoring unrecognized frame ({}): {}",
                e,
                truncate(text, FRAME_PREVIEW_CHARS)
            );
        }
    }
}

async fn send_command(
    ws_sink: &mut SplitSink<WsStream, WsMessage>,
    command: &WebViewCommand,
) -> Result<()> {
    let json = command.to_json()?;
    trace!("Web view ← {}", json);
    ws_sink
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| Error::webview(e.to_string()))
}

async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one WebSocket connection and hand back the server side
    async fn serve_once() -> (String, tokio::task::JoinHandle<WebSocketStream<tokio::net::TcpStream>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio_tungstenite::accept_async(stream).await.unwrap()
        });
        (format!("ws://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_connect_failure_is_webview_error() {
        let result = WebViewClient::connect("ws://127.0.0.1:1", Duration::from_secs(2)).await;
        assert!(matches!(result, Err(Error::WebView { .. })));
    }

    #[tokio::test]
    async fn test_messages_and_commands_round_trip_over_socket() {
        let (endpoint, server) = serve_once().await;
        let mut client = WebViewClient::connect(&endpoint, Duration::from_secs(2))
            .await
            .unwrap();
        let mut server = server.await.unwrap();

        server
            .send(WsMessage::Text(r#"{"type":"domLoaded"}"#.into()))
            .await
            .unwrap();
        server
            .send(WsMessage::Text(r#"{"type":"bogus"}"#.into()))
            .await
            .unwrap();
        server
            .send(WsMessage::Text(r#"{"type":"backButtonPressed"}"#.into()))
            .await
            .unwrap();

        assert_eq!(client.messages.recv().await, Some(WebViewMessage::DomLoaded));
        // The unrecognized frame is skipped
        assert_eq!(
            client.messages.recv().await,
            Some(WebViewMessage::BackButtonPressed)
        );

        client
            .commands
            .send(WebViewCommand::GenerateSignalRequest)
            .await
            .unwrap();
        match server.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                assert_eq!(text.as_str(), r#"{"type":"generateSignalRequest"}"#);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_multibyte_frame_is_skipped() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .with_test_writer()
                .finish(),
        );
        let (tx, mut rx) = mpsc::channel(4);

        // Byte 120 falls inside the first '€'
        let frame = format!("{}€€€", "x".repeat(FRAME_PREVIEW_CHARS - 1));
        forward_text(&frame, &tx).await;
        forward_text(r#"{"type":"domLoaded"}"#, &tx).await;

        assert_eq!(rx.recv().await, Some(WebViewMessage::DomLoaded));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_message_channel_closes_when_socket_closes() {
        let (endpoint, server) = serve_once().await;
        let mut client = WebViewClient::connect(&endpoint, Duration::from_secs(2))
            .await
            .unwrap();
        let mut server = server.await.unwrap();

        server.close(None).await.unwrap();
        assert_eq!(client.messages.recv().await, None);
    }
}
