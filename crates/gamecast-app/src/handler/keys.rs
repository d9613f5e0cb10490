//! Key event handlers for different UI modes

use gamecast_core::SessionStatus;

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match state.ui_mode {
        UiMode::Catalog => handle_key_catalog(key),
        UiMode::Session => handle_key_session(state, key),
        UiMode::ConfirmExit => handle_key_confirm_exit(key),
    }
}

fn handle_key_catalog(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::SelectPrevious),
        InputKey::Down | InputKey::Char('j') => Some(Message::SelectNext),
        InputKey::Enter => Some(Message::PlaySelected),
        InputKey::Char('R') => Some(Message::FetchCatalog),
        InputKey::Char('q') | InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

/// Loading, active, error and ending views share one key map
fn handle_key_session(state: &AppState, key: InputKey) -> Option<Message> {
    let failed = state.session_status() == Some(SessionStatus::Error);
    match key {
        InputKey::Esc | InputKey::Backspace => Some(Message::ExitRequested {
            skip_confirmation: false,
        }),
        InputKey::Char('r') if failed => Some(Message::Retry),
        InputKey::Enter if failed => Some(Message::Retry),
        InputKey::Char('q') | InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_confirm_exit(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y' | 'Y') | InputKey::Enter => Some(Message::ConfirmExit),
        InputKey::Char('n' | 'N') | InputKey::Esc | InputKey::Backspace => {
            Some(Message::CancelExit)
        }
        // Force quit with Ctrl+C even in dialog
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}
