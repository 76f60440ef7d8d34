//! Run configuration, read once from `tasks.json` at startup.
//!
//! ```json
//! {
//!   "rss_url": "https://sukebei.nyaa.si/?page=rss",
//!   "keywords": ["VR", "4K"],
//!   "rules": { "VR": 50 }
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the config file, so
//! the scheduler can run the binary from anywhere.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::dashboard::Vocabulary;
use crate::error::ConfigError;
use crate::fetch::RetryPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "tasks.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rss_url: String,

    /// Filter vocabulary, in button order.
    pub keywords: Vec<String>,

    /// Keyword → minimum seeder count. Loaded and handed to the renderer, not
    /// yet applied.
    #[serde(default)]
    pub rules: BTreeMap<String, u32>,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: PathBuf,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/latest.json")
}

fn default_dashboard_path() -> PathBuf {
    PathBuf::from("docs/dashboard.html")
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_retry_delay_secs() -> u64 {
    RetryPolicy::default().delay.as_secs()
}

impl Config {
    /// Read and validate the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.snapshot_path = base.join(&config.snapshot_path);
        config.dashboard_path = base.join(&config.dashboard_path);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rss_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rss_url must not be empty".into()));
        }
        if self.keywords.iter().any(|kw| kw.trim().is_empty()) {
            return Err(ConfigError::Invalid("keywords must not be blank".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.keywords.clone(), self.rules.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("tasks.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"rss_url": "https://example.com/rss", "keywords": ["VR", "4K"]}"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.rss_url, "https://example.com/rss");
        assert_eq!(config.keywords, ["VR", "4K"]);
        assert!(config.rules.is_empty());
        assert_eq!(config.snapshot_path, dir.path().join("data/latest.json"));
        assert_eq!(config.dashboard_path, dir.path().join("docs/dashboard.html"));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn rules_and_overrides_are_read() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{
                "rss_url": "https://example.com/rss",
                "keywords": ["VR"],
                "rules": {"VR": 50},
                "snapshot_path": "/var/feed/latest.json",
                "max_attempts": 5,
                "retry_delay_secs": 0
            }"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.rules.get("VR"), Some(&50));
        assert_eq!(config.snapshot_path, PathBuf::from("/var/feed/latest.json"));
        assert_eq!(config.retry_policy().max_attempts, 5);
        assert_eq!(config.retry_policy().delay, Duration::ZERO);
        assert_eq!(config.vocabulary().rules().get("VR"), Some(&50));
    }

    #[test]
    fn missing_keywords_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"rss_url": "https://example.com/rss"}"#);
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn empty_url_and_zero_attempts_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"rss_url": " ", "keywords": []}"#);
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));

        let path = write_config(
            dir.path(),
            r#"{"rss_url": "https://example.com/rss", "keywords": [], "max_attempts": 0}"#,
        );
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"rss_url": "https://example.com/rss", "keywords": ["VR", "  "]}"#,
        );
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unreadable_config_is_a_read_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("absent.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
