//! Configuration
//!
//! JSON5 configuration file with serde defaults for every field, so an empty
//! or missing file is a valid configuration.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "TALLY_CONFIG";

/// Config file used when neither a flag nor the env var names one
pub const DEFAULT_CONFIG_FILE: &str = "tally.json5";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Upper bound for `polls.defaultDueDays`
pub const MAX_DUE_DAYS: i64 = 3650;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Defaults applied to `/vote` commands
    pub polls: PollDefaults,
}

/// Defaults for options a `/vote` command leaves out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollDefaults {
    /// Days from creation until the advisory due time
    pub default_due_days: i64,
    /// Ballots a voter may hold when `max` is omitted
    pub default_max_votes: u32,
    /// Editable flag when `editable` is omitted
    pub default_editable: bool,
}

impl Default for PollDefaults {
    fn default() -> Self {
        Self {
            default_due_days: 30,
            default_max_votes: 1,
            default_editable: true,
        }
    }
}

impl Config {
    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polls.default_max_votes == 0 {
            return Err(ConfigError::Invalid(
                "polls.defaultMaxVotes must be at least 1".to_string(),
            ));
        }
        if self.polls.default_due_days < 0 {
            return Err(ConfigError::Invalid(
                "polls.defaultDueDays must not be negative".to_string(),
            ));
        }
        if self.polls.default_due_days > MAX_DUE_DAYS {
            return Err(ConfigError::Invalid(format!(
                "polls.defaultDueDays must be at most {MAX_DUE_DAYS}"
            )));
        }
        Ok(())
    }
}

/// Resolve the config path: explicit path, then `TALLY_CONFIG`, then the default file
pub fn get_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load configuration. A missing file yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = get_config_path(explicit);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(Config::default());
    }
    load_config_from(&path)
}

/// Load configuration from a specific file
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = json5::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json5"))).unwrap();
        assert_eq!(config.polls, PollDefaults::default());
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_load_json5_with_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tally.json5");
        std::fs::write(
            &path,
            r#"{
                // shorter polls on this server
                polls: { defaultDueDays: 7, defaultMaxVotes: 2 },
                logging: { level: "debug", format: "json" },
            }"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.polls.default_due_days, 7);
        assert_eq!(config.polls.default_max_votes, 2);
        assert!(config.polls.default_editable);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json5");
        std::fs::write(&path, "{ polls: { defaultMaxVotes: 0 } }").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "{ polls: ").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_due_days_upper_bound() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("far.json5");
        std::fs::write(&path, "{ polls: { defaultDueDays: 1000000000 } }").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, format!("{{ polls: {{ defaultDueDays: {MAX_DUE_DAYS} }} }}")).unwrap();
        assert_eq!(load_config_from(&path).unwrap().polls.default_due_days, MAX_DUE_DAYS);
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = get_config_path(Some(Path::new("/etc/tally/custom.json5")));
        assert_eq!(path, PathBuf::from("/etc/tally/custom.json5"));
    }
}
