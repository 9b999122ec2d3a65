//! Environment-driven configuration, read once at start-up.

use std::path::PathBuf;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::AppError;

pub const LOG_FORMAT_VAR: &str = "FABLEPATH_LOG_FORMAT";
pub const RECORD_PATH_VAR: &str = "FABLEPATH_RECORD_PATH";
pub const PLAYER_ID_VAR: &str = "FABLEPATH_PLAYER_ID";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable text.
    Text,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" => Ok(Self::Text),
            other => Err(AppError::Config(format!(
                "{LOG_FORMAT_VAR} must be `json` or `text`, got {other:?}"
            ))),
        }
    }
}

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub log_format: LogFormat,
    /// JSON-lines file finished sessions are appended to.
    pub record_path: Option<PathBuf>,
    /// Player credited when `--player` is not given.
    pub default_player: Option<Uuid>,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_format = get(LOG_FORMAT_VAR)
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        let record_path = get(RECORD_PATH_VAR).map(PathBuf::from);

        let default_player = get(PLAYER_ID_VAR)
            .map(|value| {
                Uuid::parse_str(value.trim()).map_err(|e| {
                    AppError::Config(format!("{PLAYER_ID_VAR} must be a UUID: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            log_format,
            record_path,
            default_player,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_reads_every_variable() {
        // Arrange
        let player = Uuid::new_v4();
        let player_str = player.to_string();
        let lookup = lookup_from(&[
            (LOG_FORMAT_VAR, "TEXT"),
            (RECORD_PATH_VAR, "/tmp/sessions.jsonl"),
            (PLAYER_ID_VAR, player_str.as_str()),
        ]);

        // Act
        let config = Config::from_lookup(lookup).unwrap();

        // Assert
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(
            config.record_path,
            Some(PathBuf::from("/tmp/sessions.jsonl"))
        );
        assert_eq!(config.default_player, Some(player));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config =
            Config::from_lookup(lookup_from(&[(RECORD_PATH_VAR, ""), (PLAYER_ID_VAR, " ")]))
                .unwrap();

        assert_eq!(config.record_path, None);
        assert_eq!(config.default_player, None);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(LOG_FORMAT_VAR, "xml")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("xml")));
    }

    #[test]
    fn test_malformed_player_id_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(PLAYER_ID_VAR, "player-one")]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains(PLAYER_ID_VAR)));
    }
}
