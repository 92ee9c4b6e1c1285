//! Top-level application error.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::port::PortError;
use crate::sweep::SweepError;
use crate::terminal::TerminalError;
use thiserror::Error;

/// A specialized `Result` type for the binary.
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type.
///
/// Sweep and terminal errors are normally reported inside the menu; this
/// type covers what escapes to `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking menu task panicked or was cancelled.
    #[error("Menu task failed: {0}")]
    Task(String),
}
