//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section has defaults, so an empty file is a valid config.

use super::error::{ConfigError, ConfigResult};
use crate::sweep::{BaudCandidates, ErrorPolicy, DEFAULT_BAUD_RATES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sweep configuration
    pub sweep: SweepConfig,
    /// Serial port configuration
    pub serial: SerialConfig,
    /// Terminal hand-off configuration
    pub terminal: TerminalConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that serde alone cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        self.sweep.candidates()?;
        if self.sweep.default_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "sweep.default_timeout_secs",
                "must be at least 1 second",
            ));
        }
        if self.sweep.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "sweep.poll_interval_ms",
                "must be at least 1 millisecond",
            ));
        }
        if self.terminal.program.trim().is_empty() {
            return Err(ConfigError::validation(
                "terminal.program",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Sweep configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Rates to cycle through, in order
    pub baud_rates: Vec<u32>,
    /// Default seconds per attempt, offered at the timeout prompt
    pub default_timeout_secs: u64,
    /// Sleep between polls when no byte is waiting
    pub poll_interval_ms: u64,
    /// What to do when an attempt cannot open or read the port
    pub error_policy: ErrorPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            baud_rates: DEFAULT_BAUD_RATES.to_vec(),
            default_timeout_secs: 5,
            poll_interval_ms: 5,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl SweepConfig {
    /// The configured rates as a validated candidate list.
    pub fn candidates(&self) -> ConfigResult<BaudCandidates> {
        BaudCandidates::new(self.baud_rates.clone())
            .map_err(|e| ConfigError::validation("sweep.baud_rates", e.to_string()))
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port preselected at startup
    pub default_port: Option<String>,
    /// Port aliases for convenience
    pub port_aliases: HashMap<String, String>,
}

impl SerialConfig {
    /// Resolve a port name through aliases
    pub fn resolve_port(&self, name: &str) -> String {
        self.port_aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

/// Terminal hand-off configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Program to launch
    pub program: String,
    /// Arguments; `{port}` and `{baud}` are substituted
    pub args: Vec<String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            program: "pyserial-miniterm".to_string(),
            args: vec!["{port}".to_string(), "{baud}".to_string()],
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "warn" or "baudprobe=debug". `RUST_LOG` wins.
    pub level: String,
    /// Log output format
    pub format: LogFormat,
    /// Log file path; stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line format with colors
    Pretty,
    /// Single-line format
    #[default]
    Compact,
    /// tracing-subscriber's default format
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.sweep.baud_rates,
            vec![9600, 14400, 19200, 38400, 57600, 115200]
        );
        assert_eq!(config.sweep.default_timeout(), Duration::from_secs(5));
        assert_eq!(config.sweep.error_policy, ErrorPolicy::Abort);
        assert_eq!(config.terminal.program, "pyserial-miniterm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_alias_resolution() {
        let mut config = SerialConfig::default();
        config
            .port_aliases
            .insert("arduino".to_string(), "COM3".to_string());

        assert_eq!(config.resolve_port("arduino"), "COM3");
        assert_eq!(config.resolve_port("COM5"), "COM5");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[sweep]"));
        assert!(toml_str.contains("[terminal]"));
        assert!(toml_str.contains("error_policy = \"abort\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [sweep]
            baud_rates = [4800, 9600]
            error_policy = "continue"

            [logging]
            format = "pretty"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sweep.baud_rates, vec![4800, 9600]);
        assert_eq!(config.sweep.error_policy, ErrorPolicy::Continue);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        // Defaults should still work
        assert_eq!(config.sweep.default_timeout_secs, 5);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.sweep.baud_rates.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "sweep.baud_rates"
        ));

        let mut config = Config::default();
        config.sweep.default_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.terminal.program = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
