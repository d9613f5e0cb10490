//! Application state (Model in TEA pattern)

use gamecast_core::{AttemptId, Game, SessionStatus};

use crate::config::Settings;
use crate::session::Session;

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Game list
    #[default]
    Catalog,
    /// Loading, active or error view of the session
    Session,
    /// "Leave the game?" dialog over the active session
    ConfirmExit,
}

/// Whether the application keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Catalog screen state
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub games: Vec<Game>,
    pub selected: usize,
    pub loading: bool,
    /// Last fetch error, shown when there is nothing else to show
    pub error: Option<String>,
    /// The list came from the configured fallback
    pub offline: bool,
    /// Bumped on every completed fetch, successful or not
    pub generation: u64,
}

impl CatalogState {
    pub fn selected_game(&self) -> Option<&Game> {
        self.games.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.games.is_empty() {
            self.selected = (self.selected + 1) % self.games.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.games.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.games.len() - 1);
        }
    }

    /// Replace the list, keeping the selection on the same game if present
    pub fn replace(&mut self, games: Vec<Game>) {
        let previous = self.selected_game().map(|g| g.id());
        self.selected = previous
            .and_then(|id| games.iter().position(|g| g.id() == id))
            .unwrap_or(0);
        self.games = games;
    }
}

/// Read-only projection of the session for views and external consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub error_text: Option<String>,
    pub status_message: Option<String>,
    pub game_name: String,
    pub region: String,
    pub poll_count: u32,
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Default)]
pub struct AppState {
    pub ui_mode: UiMode,
    pub phase: AppPhase,
    pub settings: Settings,
    pub catalog: CatalogState,

    /// At most one session exists at a time
    pub session: Option<Session>,

    /// Most recently issued attempt id
    pub last_attempt: AttemptId,

    /// One-line notice for the status bar
    pub notice: Option<String>,

    /// Tick counter driving the loading animation
    pub ticks: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Allocate the id for a new session attempt
    pub fn next_attempt(&mut self) -> AttemptId {
        self.last_attempt = self.last_attempt.next();
        self.last_attempt
    }

    /// The live session, if it belongs to `attempt`
    pub fn session_for(&mut self, attempt: AttemptId) -> Option<&mut Session> {
        self.session.as_mut().filter(|s| s.attempt == attempt)
    }

    pub fn session_view(&self) -> Option<SessionView> {
        self.session.as_ref().map(|s| SessionView {
            status: s.status,
            error_text: s.error_text(),
            status_message: s.status_message.clone(),
            game_name: s.game_name.clone(),
            region: s.region.clone(),
            poll_count: s.poll_count,
        })
    }

    pub fn session_status(&self) -> Option<SessionStatus> {
        self.session.as_ref().map(|s| s.status)
    }

    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }
}
