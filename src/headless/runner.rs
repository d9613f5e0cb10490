//! Headless mode runner - main event loop without TUI

use gamecast_app::config::Settings;
use gamecast_app::{Engine, EngineEvent, Message};
use gamecast_core::prelude::*;
use gamecast_core::GameId;
use tokio::sync::{broadcast, mpsc};

use super::HeadlessEvent;

/// Run in headless mode - NDJSON events on stdout, commands on stdin
pub async fn run_headless(settings: Settings, play: Option<GameId>) -> Result<()> {
    info!("gamecast starting in headless mode");

    let mut engine = Engine::from_settings(settings)?;
    let mut events = engine.subscribe();

    // Blocking stdin reads live on their own thread
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || read_commands_blocking(stdin_tx));

    engine.start(play);
    flush_events(&mut events);

    let result = headless_event_loop(&mut engine, &mut events).await;

    engine.shutdown().await;
    flush_events(&mut events);

    info!("gamecast headless mode exiting");
    result
}

async fn headless_event_loop(
    engine: &mut Engine,
    events: &mut broadcast::Receiver<EngineEvent>,
) -> Result<()> {
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                flush_events(events);
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Write every pending engine event to stdout
fn flush_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(out) = HeadlessEvent::from_engine(&event) {
                    out.emit();
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output fell behind, {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Parse one stdin line.
///
/// `Ok(None)` for blank lines, `Err` with a description for anything that
/// is not a known command.
pub fn parse_command(line: &str) -> std::result::Result<Option<Message>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let message = match command {
        "start" => {
            let (Some(app_id), Some(group_id)) = (words.next(), words.next()) else {
                return Err("usage: start <appId> <groupId> [region...]".to_string());
            };
            let regions: Vec<String> = words.map(str::to_string).collect();
            Message::StartSession {
                game: GameId::new(app_id, group_id),
                regions: (!regions.is_empty()).then_some(regions),
            }
        }
        "retry" => Message::Retry,
        // No dialog to confirm in headless mode
        "exit" => Message::ExitRequested {
            skip_confirmation: true,
        },
        "refresh" => Message::FetchCatalog,
        "q" | "quit" => Message::Quit,
        other => return Err(format!("Unknown command: {other}")),
    };
    Ok(Some(message))
}

/// Read commands from stdin until EOF or `quit` (blocking)
fn read_commands_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(message)) => {
                let quit = matches!(message, Message::Quit);
                debug!("Stdin command: {:?}", message);
                if msg_tx.blocking_send(message).is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(reason) => {
                warn!("{}", reason);
                HeadlessEvent::error(reason, false).emit();
            }
        }
    }

    info!("Stdin reader exiting");
}
