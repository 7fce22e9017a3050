//! Static configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::AlertThresholds;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the remote vitals store.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Project the collection belongs to
    pub project_id: String,
    /// Credential presented to the store
    pub api_key: String,
    /// Document database location; in-memory when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl RemoteConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Invalid("projectId is empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("apiKey is empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .field("database_path", &self.database_path)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Directory for the local cache; in-memory when absent
    pub cache_dir: Option<PathBuf>,
    /// Heart-rate alert bounds
    pub alert_thresholds: AlertThresholds,
    /// Remote store connection, for the connected dashboard
    pub remote: Option<RemoteConfig>,
    /// Maximum number of remote documents fetched for history export
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            alert_thresholds: AlertThresholds::default(),
            remote: None,
            history_limit: 500,
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.alert_thresholds.validate()?;
        if let Some(remote) = &self.remote {
            remote.validate()?;
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("historyLimit must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.alert_thresholds.high_bpm, 120.0);
        assert_eq!(config.alert_thresholds.low_bpm, 40.0);
    }

    #[test]
    fn test_parse_remote() {
        let json = r#"{
            "cacheDir": "/tmp/heart-track",
            "remote": { "projectId": "heart-track", "apiKey": "abc123" },
            "alertThresholds": { "highBpm": 110, "lowBpm": 45 }
        }"#;
        let config = AppConfig::from_json_str(json).unwrap();

        let remote = config.remote.unwrap();
        assert_eq!(remote.project_id, "heart-track");
        assert_eq!(remote.database_path, None);
        assert_eq!(config.alert_thresholds.high_bpm, 110.0);
    }

    #[test]
    fn test_rejects_blank_api_key() {
        let json = r#"{ "remote": { "projectId": "heart-track", "apiKey": " " } }"#;
        assert!(matches!(
            AppConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let json = r#"{ "alertThresholds": { "highBpm": 40, "lowBpm": 120 } }"#;
        assert!(AppConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let remote = RemoteConfig {
            project_id: "p".into(),
            api_key: "secret-key".into(),
            database_path: None,
        };
        let debug = format!("{:?}", remote);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "historyLimit": 50 }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.history_limit, 50);
        assert!(AppConfig::from_file(dir.path().join("missing.json")).is_err());
    }
}
