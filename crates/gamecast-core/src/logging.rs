//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_FILE_NAME: &str = "gamecast.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/gamecast/logs/`.
/// Log level is controlled by the `GAMECAST_LOG` environment variable.
/// Nothing is ever written to stdout: the TUI owns the terminal and
/// headless mode owns stdout for NDJSON.
///
/// # Examples
/// ```bash
/// GAMECAST_LOG=debug gamecast
/// GAMECAST_LOG=gamecast_app=trace,info gamecast --headless
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let env_filter = EnvFilter::try_from_env("GAMECAST_LOG")
        .unwrap_or_else(|_| EnvFilter::new("gamecast=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("───────────────────────────────────────────────");
    tracing::info!("gamecast {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("───────────────────────────────────────────────");

    Ok(())
}

fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("gamecast").join("logs")
}

/// Path of the current log file (the appender adds a date suffix on rotation)
pub fn current_log_file() -> PathBuf {
    get_log_directory().join(LOG_FILE_NAME)
}
