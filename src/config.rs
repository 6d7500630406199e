//! Interpreter configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode changes kept by [`ModeHistory`](crate::core::ModeHistory) by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Deepest sub-machine nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: max_depth must be at least 1")]
    ZeroDepth,
}

/// Runtime limits and logging level.
///
/// # Example
///
/// ```rust
/// use modeset::config::Config;
///
/// let config = Config::from_json(r#"{ "history_capacity": 32 }"#).unwrap();
/// assert_eq!(config.history_capacity, 32);
/// assert_eq!(config.max_depth, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Mode changes retained in history. Zero disables recording.
    pub history_capacity: usize,
    /// Deepest sub-machine nesting a definition may use.
    pub max_depth: usize,
    /// Log filter used when `RUST_LOG` is unset, e.g. `"modeset=debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            trace_level: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            Config::from_json(r#"{ "max_depth": 4, "trace_level": "modeset=trace" }"#).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(config.trace_level.as_deref(), Some("modeset=trace"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "history": 3 }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "max_depth": 0 }"#),
            Err(ConfigError::ZeroDepth)
        ));
    }
}
