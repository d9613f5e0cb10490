//! Main TUI runner - entry point and event loop

use gamecast_app::config::Settings;
use gamecast_app::Engine;
use gamecast_core::prelude::*;
use gamecast_core::GameId;

use super::{event, render, terminal};

/// Run the TUI until the user quits or a signal arrives.
///
/// `play` starts that game as soon as the catalog request is out.
pub async fn run(settings: Settings, play: Option<GameId>) -> Result<()> {
    let mut engine = Engine::from_settings(settings)?;
    let mut term = terminal::init();

    engine.start(play);
    let result = run_loop(&mut term, &mut engine);

    // Keep the last frame visible while the session is torn down
    engine.shutdown().await;
    terminal::restore();

    info!("gamecast TUI exited");
    result
}

/// Main event loop
fn run_loop(term: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    while !engine.should_quit() {
        engine.drain_pending_messages();

        term.draw(|frame| render::view(frame, &engine.state))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    Ok(())
}
