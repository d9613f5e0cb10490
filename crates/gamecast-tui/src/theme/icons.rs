//! Glyphs used across widgets

/// Braille spinner frames for the loading views
pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Ticks each spinner frame stays on screen (ticks are 50ms apart)
const TICKS_PER_FRAME: u64 = 2;

pub const PLAYING: &str = "▶";
pub const ERROR: &str = "✗";
pub const IDLE: &str = "○";
pub const SELECTED: &str = "❯";
pub const OFFLINE: &str = "⚠";

/// Spinner frame for the current tick count
pub fn spinner_frame(ticks: u64) -> &'static str {
    let idx = (ticks / TICKS_PER_FRAME) as usize % SPINNER.len();
    SPINNER[idx]
}
