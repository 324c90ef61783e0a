use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "melo";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_local_dir().into())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("melo.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_namespaced() {
        if let Some(log) = AppDirs::log_path() {
            assert!(log.ends_with("melo/melo.log"));
        }
        if let Some(config) = AppDirs::config_path() {
            assert!(config.ends_with("config.json"));
            assert!(config.to_string_lossy().contains("melo"));
        }
    }
}
