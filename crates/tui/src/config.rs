use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// App configuration, persisted to `~/.config/eventdeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub session: Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000".to_string(),
        }
    }
}

/// The signed-in session credential.
///
/// An explicit value with a defined lifecycle: [`Session::begin`] on
/// login/signup success, [`Session::end`] on logout. Empty fields mean
/// anonymous read-only mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn begin(&mut self, token: String, user_id: String) {
        self.token = token;
        self.user_id = user_id;
    }

    pub fn end(&mut self) {
        self.token.clear();
        self.user_id.clear();
    }
}

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("eventdeck"))
}

/// Load config from the default location, falling back to defaults when the
/// file is missing or unreadable.
pub fn load_config() -> Config {
    match config_dir() {
        Ok(dir) => load_config_from(&dir.join("config.toml")),
        Err(_) => Config::default(),
    }
}

pub fn load_config_from(path: &Path) -> Config {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| toml::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_config(config: &Config) -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    save_config_to(config, &dir.join("config.toml"))
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml"));
        assert_eq!(config.server.url, "http://localhost:4000");
        assert!(!config.session.is_signed_in());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.url = "https://events.example.com".to_string();
        config.session.begin("tok-1".to_string(), "u-1".to_string());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path);
        assert_eq!(loaded.server.url, "https://events.example.com");
        assert_eq!(loaded.session.token, "tok-1");
        assert_eq!(loaded.session.user_id, "u-1");
    }

    #[test]
    fn session_lifecycle_begins_and_ends() {
        let mut session = Session::default();
        assert!(!session.is_signed_in());

        session.begin("tok-2".to_string(), "u-2".to_string());
        assert!(session.is_signed_in());

        session.end();
        assert!(!session.is_signed_in());
        assert!(session.user_id.is_empty());
    }
}
