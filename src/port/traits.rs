//! Core traits for serial port abstraction.
//!
//! The sweep engine only ever talks to these traits, so both real serial
//! ports and mock implementations can be plugged in.

use super::error::PortError;
use std::time::Duration;

/// Configuration used when opening a port for one sweep attempt.
///
/// Framing is fixed at 8N1 with no flow control; only the rate varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Timeout for a single blocking read call.
    pub timeout: Duration,
}

impl PortConfiguration {
    /// Configuration for `baud_rate` with the default read timeout.
    pub fn at(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            timeout: Duration::from_secs(1),
        }
    }
}

/// Trait for an open serial connection.
///
/// Dropping the value closes the port. Implementations must release the
/// underlying device in `Drop` so a handle can never outlive its attempt.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Number of bytes waiting in the receive buffer.
    ///
    /// This must not block.
    fn bytes_to_read(&self) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// The rate the port was opened at.
    fn baud_rate(&self) -> u32;
}

/// Opens serial ports by name and rate.
pub trait PortOpener {
    /// Open `port_name` at `baud_rate`.
    fn open(&self, port_name: &str, baud_rate: u32)
        -> Result<Box<dyn SerialPortAdapter>, PortError>;
}

/// A port visible to the platform's serial subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path or COM name.
    pub name: String,
    /// Short human description, e.g. "USB 0403:6001 FTDI".
    pub description: Option<String>,
}

impl PortInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Lists serial ports.
pub trait PortLister {
    fn list_ports(&self) -> Result<Vec<PortInfo>, PortError>;
}
