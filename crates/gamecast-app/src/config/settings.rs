//! Settings file loading and initialization

use std::path::{Path, PathBuf};

use gamecast_core::prelude::*;

use super::types::Settings;

const CONFIG_DIR: &str = "gamecast";
const CONFIG_FILENAME: &str = "config.toml";

/// Default location: `<config_dir>/gamecast/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILENAME)
}

/// Load settings from `path`, or the default location when `None`.
///
/// A missing or unreadable file is not an error: defaults are used and the
/// problem is logged.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# gamecast configuration

[api]
base_url = "http://127.0.0.1:8080"
request_timeout_ms = 10000

[auth]
# Exactly one token source is used: token, then token_env, then token_file.
# token = "..."
token_env = "GAMECAST_TOKEN"
# token_file = "/run/user/1000/gamecast/token"
user_id = ""

[session]
poll_interval_ms = 3000             # Delay between readiness checks (min 250)
max_poll_attempts = 10              # Status checks before giving up
poll_timeout_secs = 60              # Wall-clock limit for the whole wait
accept_signal_without_active = true # A remote signal alone means ready
confirm_exit = true                 # Ask before leaving an active session
default_regions = []

[webview]
endpoint = "ws://127.0.0.1:9223/bridge"
connect_timeout_ms = 5000
signal_timeout_ms = 15000

# Games to show when the catalog cannot be fetched
# [[catalog.fallback]]
# app_id = "..."
# group_id = "..."
# name = "..."
# ordering = 1
"#;

/// Write a commented default config file to `path` (or the default
/// location). An existing file is left untouched.
///
/// Returns the path of the config file.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if config_path.exists() {
        info!("Config file already exists at {:?}", config_path);
        return Ok(config_path);
    }

    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::config(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }

    std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
        Error::config(format!("Failed to write {}: {}", config_path.display(), e))
    })?;

    info!("Created default config at {:?}", config_path);
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.toml")));
        assert_eq!(settings.session.max_poll_attempts, 10);
    }

    #[test]
    fn test_load_settings_invalid_toml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session\nbroken").unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.session.poll_interval_ms, 3_000);
    }

    #[test]
    fn test_load_settings_reads_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://games.example.com/prod"

[auth]
token = "abc"
user_id = "player-1"

[session]
confirm_exit = false
default_regions = ["us-west-2"]
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.api.base_url, "https://games.example.com/prod");
        assert_eq!(settings.auth.token.as_deref(), Some("abc"));
        assert_eq!(settings.auth.user_id, "player-1");
        assert!(!settings.session.confirm_exit);
        assert_eq!(settings.session.default_regions, vec!["us-west-2"]);
    }

    #[test]
    fn test_init_config_writes_parseable_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let written = init_config(Some(&path)).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();
        assert_eq!(parsed.auth.token_env.as_deref(), Some("GAMECAST_TOKEN"));
        assert_eq!(parsed.session.max_poll_attempts, 10);
    }

    #[test]
    fn test_init_config_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine").unwrap();

        init_config(Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }
}
