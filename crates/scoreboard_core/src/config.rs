//! Configuration for the scoreboard engine.
//!
//! Settings are read from a TOML file. A missing file is created with the
//! defaults so operators get a template to edit.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Quiescence window before a coalesced full sync runs.
pub const DEFAULT_SYNC_DEBOUNCE_MS: u64 = 1000;

fn default_owner() -> String {
    "ScoreboardCore".to_string()
}

fn default_sync_debounce_ms() -> u64 {
    DEFAULT_SYNC_DEBOUNCE_MS
}

fn default_purge_stale_triggers() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreboardSettings {
    /// Engine behaviour
    #[serde(default)]
    pub scoreboard: ScoreboardConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Engine behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreboardConfig {
    /// Owner name the log processor is registered under
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Debounce window for full syncs, in milliseconds
    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,
    /// Remove `tri_*` objectives left by a previous process on start
    #[serde(default = "default_purge_stale_triggers")]
    pub purge_stale_triggers: bool,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            sync_debounce_ms: DEFAULT_SYNC_DEBOUNCE_MS,
            purge_stale_triggers: true,
        }
    }
}

impl ScoreboardConfig {
    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level filter (trace, debug, info, warn, error); `RUST_LOG` wins if set
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_format: false,
        }
    }
}

impl ScoreboardSettings {
    /// Loads settings from `path`, writing the defaults there if the file
    /// does not exist yet.
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let settings: ScoreboardSettings = toml::from_str(&content).map_err(|e| {
                warn!("Failed to parse config file {}: {}", path.display(), e);
                e
            })?;
            settings.validate()?;
            Ok(settings)
        } else {
            let settings = ScoreboardSettings::default();
            let content = toml::to_string_pretty(&settings)?;
            tokio::fs::write(path, content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(settings)
        }
    }

    /// Checks the settings for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoreboard.owner.trim().is_empty() {
            return Err(ConfigError::Invalid("owner cannot be empty".to_string()));
        }

        if self.scoreboard.sync_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "sync_debounce_ms must be greater than zero".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = ScoreboardSettings::default();
        assert_eq!(settings.scoreboard.owner, "ScoreboardCore");
        assert_eq!(settings.scoreboard.sync_debounce_ms, 1000);
        assert_eq!(settings.scoreboard.sync_debounce(), Duration::from_secs(1));
        assert!(settings.scoreboard.purge_stale_triggers);
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.json_format);
        assert!(settings.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.toml");
        assert!(!path.exists());

        let settings = ScoreboardSettings::load_from_file(&path).await.unwrap();
        assert_eq!(settings.scoreboard.sync_debounce_ms, 1000);
        assert!(path.exists());

        // the written template loads back to the same values
        let reloaded = ScoreboardSettings::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.scoreboard.owner, settings.scoreboard.owner);
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.toml");
        tokio::fs::write(
            &path,
            r#"
[scoreboard]
owner = "Scores"
sync_debounce_ms = 250
purge_stale_triggers = false

[logging]
level = "debug"
json_format = true
"#,
        )
        .await
        .unwrap();

        let settings = ScoreboardSettings::load_from_file(&path).await.unwrap();
        assert_eq!(settings.scoreboard.owner, "Scores");
        assert_eq!(settings.scoreboard.sync_debounce(), Duration::from_millis(250));
        assert!(!settings.scoreboard.purge_stale_triggers);
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.json_format);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: ScoreboardSettings = toml::from_str("[scoreboard]\nsync_debounce_ms = 50\n").unwrap();
        assert_eq!(settings.scoreboard.sync_debounce_ms, 50);
        assert_eq!(settings.scoreboard.owner, "ScoreboardCore");
        assert!(settings.scoreboard.purge_stale_triggers);
        assert_eq!(settings.logging.level, "info");
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.toml");
        tokio::fs::write(&path, "[scoreboard\nowner = ").await.unwrap();

        let result = ScoreboardSettings::load_from_file(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = ScoreboardSettings::default();
        settings.scoreboard.sync_debounce_ms = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("sync_debounce_ms"));

        let mut settings = ScoreboardSettings::default();
        settings.scoreboard.owner = "  ".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = ScoreboardSettings::default();
        settings.logging.level = "loud".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
