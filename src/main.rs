//! gamecast - browse and play cloud-streamed games from the couch
//!
//! This is the binary entry point: argument parsing, logging setup and the
//! choice between the TUI and headless mode.

mod headless;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gamecast_app::config::{self, Settings};
use gamecast_core::prelude::*;
use gamecast_core::GameId;

/// gamecast - a TV-style client for cloud-streamed games
#[derive(Parser, Debug)]
#[command(name = "gamecast", version)]
#[command(about = "Browse the catalog and stream games through the embedded web view", long_about = None)]
struct Args {
    /// Settings file (default: <config dir>/gamecast/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Override the web-view bridge endpoint
    #[arg(long, value_name = "URL")]
    webview: Option<String>,

    /// Run in headless mode (NDJSON on stdout, commands on stdin)
    #[arg(long)]
    headless: bool,

    /// Start this game right away
    #[arg(long, value_name = "APP:GROUP", value_parser = parse_game_id)]
    play: Option<GameId>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a commented default settings file and exit
    InitConfig,
}

fn parse_game_id(s: &str) -> std::result::Result<GameId, String> {
    GameId::parse_pair(s).ok_or_else(|| format!("expected APP:GROUP, got '{s}'"))
}

impl Args {
    /// Command-line flags win over the settings file
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.api_url {
            settings.api.base_url = url.clone();
        }
        if let Some(endpoint) = &self.webview {
            settings.webview.endpoint = endpoint.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    let args = Args::parse();

    if let Some(Command::InitConfig) = args.command {
        let path = config::init_config(args.config.as_deref())?;
        eprintln!("Settings file: {}", path.display());
        return Ok(());
    }

    gamecast_core::logging::init()?;

    let mut settings = config::load_settings(args.config.as_deref());
    args.apply_overrides(&mut settings);
    info!("Backend: {}", settings.api.base_url);

    if args.headless {
        headless::runner::run_headless(settings, args.play).await
    } else {
        gamecast_tui::run(settings, args.play).await
    }
}
