//! Port-specific error types.
//!
//! Kept separate from sweep and application errors so the port layer can be
//! used on its own.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The port exists but the current user may not open it.
    #[error("Permission denied opening {0}")]
    PermissionDenied(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration failed (e.g. the driver rejected the baud rate).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Port enumeration failed.
    #[error("Failed to enumerate serial ports: {0}")]
    Enumeration(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Map an error from `serialport::SerialPortBuilder::open` for `port_name`.
    pub fn from_open(port_name: &str, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => Self::not_found(port_name),
            serialport::ErrorKind::InvalidInput => Self::config(err.to_string()),
            serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => Self::not_found(port_name),
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                Self::PermissionDenied(port_name.to_string())
            }
            _ => Self::Serial(err),
        }
    }
}
