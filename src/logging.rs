//! Tracing subscriber setup.
//!
//! Logs go to stderr (or the configured file) so they never interleave
//! with the menu on stdout. `RUST_LOG` takes precedence over
//! `logging.level`.

use crate::config::{LogFormat, LoggingConfig};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    #[error("Failed to open log file '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Build the filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::Filter {
        directive: level.to_string(),
        message: e.to_string(),
    })
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&config.level)?;

    let (writer, ansi) = match config.file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Full => builder.try_init(),
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_rejected() {
        // Only meaningful when RUST_LOG is unset.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(
                build_filter("baudprobe=loud"),
                Err(LoggingError::Filter { .. })
            ));
        }
    }

    #[test]
    fn test_level_directive_accepted() {
        assert!(build_filter("warn").is_ok());
        assert!(build_filter("baudprobe=debug,info").is_ok());
    }

    #[test]
    fn test_unwritable_log_file() {
        let config = LoggingConfig {
            file: Some(PathBuf::from("/nonexistent-dir-baudprobe/log.txt")),
            ..LoggingConfig::default()
        };
        assert!(matches!(init(&config), Err(LoggingError::File { .. })));
    }
}
