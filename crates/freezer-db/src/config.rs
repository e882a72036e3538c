//! Seeder configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The `seed` binary applies its command line flags on top.
//!
//! | Variable              | Default            |
//! |-----------------------|--------------------|
//! | `FREEZER_DB_PATH`     | `./freezer_dev.db` |
//! | `FREEZER_FIXTURE`     | built-in fixture   |
//! | `FREEZER_ON_CONFLICT` | `fail`             |
//! | `FREEZER_VERIFY`      | `true`             |
//! | `FREEZER_LOG_FORMAT`  | `pretty`           |

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::seeder::ConflictPolicy;

pub const DEFAULT_DB_PATH: &str = "./freezer_dev.db";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Seeder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Fixture JSON file; `None` loads the built-in fixture
    pub fixture_path: Option<PathBuf>,

    /// Duplicate-key handling
    pub on_conflict: ConflictPolicy,

    /// Read the data back after loading
    pub verify: bool,

    pub log_format: LogFormat,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            fixture_path: None,
            on_conflict: ConflictPolicy::Fail,
            verify: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl SeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SeedConfig::default();

        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(SeedConfig {
            database_path: get("FREEZER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            fixture_path: get("FREEZER_FIXTURE").map(PathBuf::from),

            on_conflict: match get("FREEZER_ON_CONFLICT") {
                Some(value) => value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: "FREEZER_ON_CONFLICT".to_string(),
                        reason,
                    })?,
                None => defaults.on_conflict,
            },

            verify: match get("FREEZER_VERIFY") {
                Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                    key: "FREEZER_VERIFY".to_string(),
                    reason: format!("expected a boolean, got '{value}'"),
                })?,
                None => defaults.verify,
            },

            log_format: match get("FREEZER_LOG_FORMAT") {
                Some(value) => value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: "FREEZER_LOG_FORMAT".to_string(),
                        reason,
                    })?,
                None => defaults.log_format,
            },
        })
    }

    /// Label recorded with each seed run.
    pub fn fixture_label(&self) -> String {
        match &self.fixture_path {
            Some(path) => path.display().to_string(),
            None => "builtin".to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SeedConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SeedConfig::default());
        assert_eq!(config.fixture_label(), "builtin");
    }

    #[test]
    fn test_reads_every_variable() {
        let config = SeedConfig::from_lookup(lookup(&[
            ("FREEZER_DB_PATH", "/tmp/freezers.db"),
            ("FREEZER_FIXTURE", "fixtures/freezers.json"),
            ("FREEZER_ON_CONFLICT", "skip"),
            ("FREEZER_VERIFY", "no"),
            ("FREEZER_LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/freezers.db"));
        assert_eq!(config.fixture_label(), "fixtures/freezers.json");
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert!(!config.verify);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_value_is_unset() {
        let config = SeedConfig::from_lookup(lookup(&[("FREEZER_FIXTURE", "  ")])).unwrap();
        assert_eq!(config.fixture_path, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SeedConfig::from_lookup(lookup(&[("FREEZER_ON_CONFLICT", "overwrite")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for FREEZER_ON_CONFLICT: expected 'fail' or 'skip', got 'overwrite'"
        );

        assert!(SeedConfig::from_lookup(lookup(&[("FREEZER_VERIFY", "maybe")])).is_err());
        assert!(SeedConfig::from_lookup(lookup(&[("FREEZER_LOG_FORMAT", "xml")])).is_err());
    }
}
