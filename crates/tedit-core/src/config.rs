//! Editor configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::WrapMode;

/// Default viewport width used for wrap-aware motion.
pub const DEFAULT_VIEWPORT_COLUMNS: usize = 80;

/// Errors produced while loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input is not a valid configuration document.
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    /// `viewport_columns` must be at least 1.
    #[error("viewport_columns must be greater than zero")]
    InvalidViewportColumns,
}

/// Settings that shape cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether vertical motion follows wrapped visual rows.
    pub wrap_mode: WrapMode,
    /// Width of the text area in cells; the chunk width for wrapped lines.
    pub viewport_columns: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wrap_mode: WrapMode::Wrap,
            viewport_columns: DEFAULT_VIEWPORT_COLUMNS,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_columns == 0 {
            return Err(ConfigError::InvalidViewportColumns);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.viewport_columns, 80);
        assert_eq!(config.wrap_mode, WrapMode::Wrap);
    }

    #[test]
    fn test_partial_override() {
        let config =
            EditorConfig::from_json_str(r#"{"wrap_mode": "no_wrap", "viewport_columns": 40}"#)
                .unwrap();
        assert_eq!(config.wrap_mode, WrapMode::NoWrap);
        assert_eq!(config.viewport_columns, 40);
    }

    #[test]
    fn test_zero_columns_rejected() {
        let err = EditorConfig::from_json_str(r#"{"viewport_columns": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViewportColumns));
    }

    #[test]
    fn test_malformed_input() {
        let err = EditorConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
