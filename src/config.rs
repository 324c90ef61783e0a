use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::error::StartupError;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub genius_token: Option<String>,
    pub reveal_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub hint_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genius_token: None,
            reveal_delay_ms: 2000,
            request_timeout_secs: 12,
            hint_lines: 2,
        }
    }
}

/// Values given on the command line or through the environment. Anything
/// left `None` falls back to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub reveal_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Settings the game runs with after merging overrides into the config
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub token: String,
    pub reveal_delay: Duration,
    pub request_timeout: Duration,
    pub hint_lines: usize,
}

impl RuntimeSettings {
    pub fn resolve(
        config: Config,
        overrides: Overrides,
        config_path: &Path,
    ) -> Result<Self, StartupError> {
        let token = overrides
            .token
            .into_iter()
            .chain(config.genius_token)
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
            .ok_or_else(|| StartupError::MissingToken(config_path.display().to_string()))?;

        Ok(Self {
            token,
            reveal_delay: Duration::from_millis(
                overrides.reveal_delay_ms.unwrap_or(config.reveal_delay_ms),
            ),
            request_timeout: Duration::from_secs(
                overrides
                    .request_timeout_secs
                    .unwrap_or(config.request_timeout_secs),
            ),
            hint_lines: config.hint_lines.max(1),
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reveal_delay: self.reveal_delay,
            hint_lines: self.hint_lines,
        }
    }
}

/// Read side of the config file. melo never writes it; users edit it by hand.
pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("melo_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Ignoring unreadable config {}: {err}", self.path.display());
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn full_file_loads_every_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "genius_token": "abc",
                "reveal_delay_ms": 500,
                "request_timeout_secs": 3,
                "hint_lines": 1
            }"#,
        )
        .unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(
            loaded,
            Config {
                genius_token: Some("abc".into()),
                reveal_delay_ms: 500,
                request_timeout_secs: 3,
                hint_lines: 1,
            }
        );
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "genius_token": "secret" }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.genius_token.as_deref(), Some("secret"));
        assert_eq!(loaded.reveal_delay_ms, 2000);
        assert_eq!(loaded.hint_lines, 2);
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn overrides_win_over_config() {
        let config = Config {
            genius_token: Some("from-config".into()),
            reveal_delay_ms: 1000,
            request_timeout_secs: 30,
            hint_lines: 3,
        };
        let overrides = Overrides {
            token: Some("from-cli".into()),
            reveal_delay_ms: Some(250),
            request_timeout_secs: None,
        };

        let settings =
            RuntimeSettings::resolve(config, overrides, Path::new("config.json")).unwrap();
        assert_eq!(settings.token, "from-cli");
        assert_eq!(settings.reveal_delay, Duration::from_millis(250));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.session_config().hint_lines, 3);
    }

    #[test]
    fn config_token_is_used_when_cli_is_blank() {
        let config = Config {
            genius_token: Some(" from-config ".into()),
            ..Config::default()
        };
        let overrides = Overrides {
            token: Some("   ".into()),
            ..Overrides::default()
        };

        let settings =
            RuntimeSettings::resolve(config, overrides, Path::new("config.json")).unwrap();
        assert_eq!(settings.token, "from-config");
        assert_eq!(settings.reveal_delay, Duration::from_millis(2000));
        assert_eq!(settings.request_timeout, Duration::from_secs(12));
    }

    #[test]
    fn missing_token_is_an_error() {
        let result = RuntimeSettings::resolve(
            Config::default(),
            Overrides::default(),
            Path::new("/home/me/.config/melo/config.json"),
        );
        assert_matches!(result, Err(StartupError::MissingToken(path)) => {
            assert_eq!(path, "/home/me/.config/melo/config.json");
        });
    }

    #[test]
    fn zero_hint_lines_is_raised_to_one() {
        let config = Config {
            genius_token: Some("token".into()),
            hint_lines: 0,
            ..Config::default()
        };

        let settings =
            RuntimeSettings::resolve(config, Overrides::default(), Path::new("config.json"))
                .unwrap();
        assert_eq!(settings.hint_lines, 1);
        assert_eq!(settings.session_config().hint_lines, 1);
    }
}
