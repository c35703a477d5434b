use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/mailbox-settings/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("mailbox-settings").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `Config::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Loads, parses and validates the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The fallback error description is not blank
    /// - The log filter is not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toasts.fallback_error.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "toasts.fallback_error must not be empty".to_string(),
            });
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "logging.filter must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings.debounce_ms, 500);
        assert_eq!(config.toasts.fallback_error, "An error occurred");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[settings]
debounce_ms = 250

[api]
latency_ms = 40
"#,
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.debounce().as_millis(), 250);
        assert_eq!(config.api.latency().as_millis(), 40);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "invalid { toml }");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn blank_fallback_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[toasts]\nfallback_error = \"  \"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("toasts.fallback_error"));
    }
}
