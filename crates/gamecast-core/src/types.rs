//! Core domain types

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────
// Games
// ─────────────────────────────────────────────────────────

/// Identifier pair routing every session-scoped API call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId {
    pub app_id: String,
    pub group_id: String,
}

impl GameId {
    pub fn new(app_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            group_id: group_id.into(),
        }
    }

    /// Parse the `APP:GROUP` form used on the command line
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (app, group) = s.split_once(':')?;
        let (app, group) = (app.trim(), group.trim());
        if app.is_empty() || group.is_empty() {
            return None;
        }
        Some(Self::new(app, group))
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.app_id, self.group_id)
    }
}

/// A streamable title as returned by the catalog endpoint.
///
/// Accepts both the camelCase field names of the catalog endpoint and the
/// PascalCase identifiers the session endpoints use, plus snake_case for
/// games declared in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "appId", alias = "AppIdentifier", alias = "app_id")]
    pub app_id: String,

    #[serde(rename = "groupId", alias = "SGIdentifier", alias = "group_id")]
    pub group_id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<i64>,

    #[serde(
        default,
        rename = "inputDevices",
        alias = "input_devices",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub input_devices: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub regions: Vec<String>,
}

impl Game {
    pub fn id(&self) -> GameId {
        GameId::new(&self.app_id, &self.group_id)
    }

    fn sort_key(&self) -> i64 {
        // Titles without an explicit ordering go after every ordered title
        self.ordering.unwrap_or(i64::MAX)
    }
}

/// Deserialize an explicit JSON `null` as the type's default value.
///
/// Pair with `#[serde(default)]` so a missing field behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sort games by ascending `ordering`, breaking ties by `name`.
///
/// The sort is stable, so games with equal ordering and name keep the order
/// the backend returned them in.
pub fn sort_games(games: &mut [Game]) {
    games.sort_by(|a, b| {
        a.sort_key()
            .cmp(&b.sort_key())
            .then_with(|| a.name.cmp(&b.name))
    });
}

// ─────────────────────────────────────────────────────────
// Session Status
// ─────────────────────────────────────────────────────────

/// Lifecycle state of the (single) play session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for the streaming SDK and a credential
    #[default]
    Initializing,
    /// Local signal generated, `create_session` in flight
    CreatingSession,
    /// Backend session exists, polling for readiness
    WaitingForSession,
    /// Remote signal applied, stream is interactive
    Active,
    /// Teardown in progress
    Ending,
    /// Attempt failed; terminal until retry or exit
    Error,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Initializing => "Initializing",
            SessionStatus::CreatingSession => "Creating session",
            SessionStatus::WaitingForSession => "Waiting for session",
            SessionStatus::Active => "Active",
            SessionStatus::Ending => "Ending",
            SessionStatus::Error => "Error",
        }
    }

    /// True while the session is still being established
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SessionStatus::Initializing
                | SessionStatus::CreatingSession
                | SessionStatus::WaitingForSession
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session status string as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Pending,
    Activating,
    Connected,
    Active,
    Terminating,
    Terminated,
    Error,
    Other(String),
}

impl RemoteStatus {
    /// Parse a backend status string (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => RemoteStatus::Pending,
            "ACTIVATING" => RemoteStatus::Activating,
            "CONNECTED" => RemoteStatus::Connected,
            "ACTIVE" => RemoteStatus::Active,
            "TERMINATING" => RemoteStatus::Terminating,
            "TERMINATED" => RemoteStatus::Terminated,
            "ERROR" => RemoteStatus::Error,
            _ => RemoteStatus::Other(s.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RemoteStatus::Active)
    }

    /// The backend gave up on the session; waiting any longer is pointless
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            RemoteStatus::Error | RemoteStatus::Terminating | RemoteStatus::Terminated
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RemoteStatus::Pending => "PENDING",
            RemoteStatus::Activating => "ACTIVATING",
            RemoteStatus::Connected => "CONNECTED",
            RemoteStatus::Active => "ACTIVE",
            RemoteStatus::Terminating => "TERMINATING",
            RemoteStatus::Terminated => "TERMINATED",
            RemoteStatus::Error => "ERROR",
            RemoteStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────
// Credentials & Attempts
// ─────────────────────────────────────────────────────────

/// Bearer token plus the user it was issued to
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Monotonic identifier of one session attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn next(self) -> Self {
        AttemptId(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(ordering: Option<i64>, name: &str) -> Game {
        Game {
            app_id: format!("app-{name}"),
            group_id: "sg".into(),
            name: name.into(),
            description: None,
            ordering,
            input_devices: vec![],
            regions: vec![],
        }
    }

    fn names(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_sort_games_ties_broken_by_name() {
        let mut games = vec![game(Some(1), "B"), game(Some(1), "A"), game(Some(2), "C")];
        sort_games(&mut games);
        assert_eq!(names(&games), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_games_is_stable_for_identical_keys() {
        let mut first = game(Some(1), "Same");
        first.app_id = "first".into();
        let mut second = game(Some(1), "Same");
        second.app_id = "second".into();

        let mut games = vec![first, second];
        sort_games(&mut games);
        assert_eq!(games[0].app_id, "first");
        assert_eq!(games[1].app_id, "second");
    }

    #[test]
    fn test_sort_games_unordered_titles_go_last() {
        let mut games = vec![game(None, "A"), game(Some(5), "Z")];
        sort_games(&mut games);
        assert_eq!(names(&games), vec!["Z", "A"]);
    }

    #[test]
    fn test_game_deserializes_camel_case() {
        let json = r#"{"appId":"a1","groupId":"sg1","name":"Racer","ordering":3,"inputDevices":["gamepad"]}"#;
        let g: Game = serde_json::from_str(json).unwrap();
        assert_eq!(g.id(), GameId::new("a1", "sg1"));
        assert_eq!(g.ordering, Some(3));
        assert_eq!(g.input_devices, vec!["gamepad"]);
        assert!(g.description.is_none());
    }

    #[test]
    fn test_game_deserializes_backend_identifiers() {
        let json = r#"{"AppIdentifier":"a1","SGIdentifier":"sg1","name":"Racer"}"#;
        let g: Game = serde_json::from_str(json).unwrap();
        assert_eq!(g.app_id, "a1");
        assert_eq!(g.group_id, "sg1");
    }

    #[test]
    fn test_game_accepts_null_lists() {
        let json = r#"{"appId":"a1","groupId":"sg1","name":"Racer","description":null,"ordering":null,"inputDevices":null,"regions":null}"#;
        let g: Game = serde_json::from_str(json).unwrap();
        assert!(g.input_devices.is_empty());
        assert!(g.regions.is_empty());
        assert!(g.ordering.is_none());
    }

    #[test]
    fn test_game_id_parse_pair() {
        assert_eq!(
            GameId::parse_pair("app:group"),
            Some(GameId::new("app", "group"))
        );
        assert_eq!(GameId::parse_pair("app"), None);
        assert_eq!(GameId::parse_pair(":group"), None);
    }

    #[test]
    fn test_remote_status_parse() {
        assert_eq!(RemoteStatus::parse("ACTIVE"), RemoteStatus::Active);
        assert_eq!(RemoteStatus::parse("active"), RemoteStatus::Active);
        assert_eq!(RemoteStatus::parse("PENDING"), RemoteStatus::Pending);
        assert!(RemoteStatus::parse("ERROR").is_failed());
        assert!(RemoteStatus::parse("TERMINATED").is_failed());
        assert!(!RemoteStatus::parse("ACTIVATING").is_failed());
        assert_eq!(
            RemoteStatus::parse("WARMING"),
            RemoteStatus::Other("WARMING".into())
        );
    }

    #[test]
    fn test_session_status_is_loading() {
        assert!(SessionStatus::Initializing.is_loading());
        assert!(SessionStatus::WaitingForSession.is_loading());
        assert!(!SessionStatus::Active.is_loading());
        assert!(!SessionStatus::Error.is_loading());
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let cred = Credential::new("secret-token", "user-1");
        let dbg = format!("{cred:?}");
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("user-1"));
    }

    #[test]
    fn test_attempt_id_increments() {
        let a = AttemptId::default();
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.value(), 1);
    }
}
