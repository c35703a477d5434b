use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub toasts: ToastConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Behaviour of the settings panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Quiet time after the last edit before a debounced save fires (default: 500).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Toast wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Description of an error toast when the failure has no message.
    #[serde(default = "default_fallback_error")]
    pub fallback_error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// In-memory mailbox API used by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Simulated round-trip latency in milliseconds (default: 0).
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_fallback_error() -> String {
    "An error occurred".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl SettingsConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ApiConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            fallback_error: default_fallback_error(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
