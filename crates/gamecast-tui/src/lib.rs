//! gamecast-tui - Terminal UI for gamecast
//!
//! This crate provides the ratatui-based presentation shell. It creates an
//! Engine from gamecast-app and adds terminal rendering, event polling and
//! widget display.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
