//! Custom widget components

mod catalog_list;
mod confirm_dialog;
mod header;
pub mod modal_overlay;
mod session_view;
mod status_bar;

pub use catalog_list::{truncate_to_width, CatalogList};
pub use confirm_dialog::ConfirmExitDialog;
pub use header::{shortcuts, MainHeader};
pub use session_view::SessionPanel;
pub use status_bar::{StatusBar, StatusBarCompact};
