//! TOML-based application configuration.
//!
//! Stores the acting user id and the Slack workflow webhook settings.
//! Configuration lives at `~/.config/kintai/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{AttendanceError, Result};

/// Acting-user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Opaque user id the CLI acts as. Identity verification itself is an
    /// external concern.
    #[serde(default = "default_user_id")]
    pub id: String,
}

/// Slack workflow webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Workflow Builder "from a webhook" trigger URL. May be left empty and
    /// supplied via the SLACK_WORKFLOW_TRIGGER_URL environment variable.
    #[serde(default)]
    pub trigger_url: String,
    /// Bound on the outbound POST; a timeout counts as a failed delivery.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/kintai/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

fn default_user_id() -> String {
    "local".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            trigger_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: UserConfig::default(),
            slack: SlackConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config on first use.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| AttendanceError::Config(format!("{}: {e}", path.display())))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AttendanceError::Config(e.to_string()))?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.user.id, "local");
        assert_eq!(parsed.slack.timeout_secs, 10);
        assert!(parsed.slack.trigger_url.is_empty());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.user.id, "local");
        assert_eq!(parsed.slack.timeout_secs, 10);
    }
}
