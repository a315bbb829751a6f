//! Error types.
//!
//! Engine operations (objectives, scores, triggers) never fail outward: bad
//! replies degrade to stale or default data. Only the surrounding plumbing,
//! configuration loading in particular, reports errors.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`crate::config::ScoreboardSettings`]
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Default configuration could not be serialized
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Parsed values are inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
