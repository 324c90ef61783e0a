use thiserror::Error;

/// Failures of the lyrics collaborator. None of these reach the player: the
/// fetch boundary logs them and shows the not-found placeholder instead.
#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("lyrics provider answered with status {0}")]
    Status(u16),

    #[error("lyrics provider rate limit hit")]
    RateLimited,

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for LyricsError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(429, _) => LyricsError::RateLimited,
            ureq::Error::Status(code, _) => LyricsError::Status(code),
            ureq::Error::Transport(transport) => LyricsError::Transport(transport.to_string()),
        }
    }
}

impl From<serde_json::Error> for LyricsError {
    fn from(error: serde_json::Error) -> Self {
        LyricsError::Decode(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file {0} is missing or not valid UTF-8")]
    MissingFile(String),

    #[error("catalog file {file} could not be parsed: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog contains no artists")]
    Empty,
}

/// Errors that stop the game before the terminal UI is shown.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(
        "no Genius access token found; pass --token, set GENIUS_ACCESS_TOKEN, or add \"genius_token\" to {0}"
    )]
    MissingToken(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_decode_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let lyrics: LyricsError = err.into();
        assert!(matches!(lyrics, LyricsError::Decode(_)));
    }

    #[test]
    fn missing_token_message_names_config_path() {
        let err = StartupError::MissingToken("/tmp/melo/config.json".to_string());
        let message = err.to_string();
        assert!(message.contains("GENIUS_ACCESS_TOKEN"));
        assert!(message.contains("/tmp/melo/config.json"));
    }
}
