//! Sweep error types.

use crate::port::PortError;
use thiserror::Error;

/// Errors that end or interrupt a sweep.
///
/// Cancellation is not an error; it is reported through `SweepReport`.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Opening or reading the port failed during one attempt.
    #[error("{port} at {baud_rate} baud: {source}")]
    Attempt {
        port: String,
        baud_rate: u32,
        #[source]
        source: PortError,
    },

    /// The candidate list cannot be swept.
    #[error("Invalid baud rate list: {0}")]
    InvalidCandidates(String),
}

impl SweepError {
    pub(crate) fn attempt(port: &str, baud_rate: u32, source: PortError) -> Self {
        Self::Attempt {
            port: port.to_string(),
            baud_rate,
            source,
        }
    }

    /// The rate an attempt failed at, if this is an attempt error.
    pub fn baud_rate(&self) -> Option<u32> {
        match self {
            Self::Attempt { baud_rate, .. } => Some(*baud_rate),
            Self::InvalidCandidates(_) => None,
        }
    }
}
