//! Per-sweep state.

use super::candidates::BaudCandidates;
use std::time::Duration;

/// Transient state of one sweep: target port, attempt timeout, and the
/// cursor into the candidate list.
#[derive(Debug)]
pub struct SweepSession<'a> {
    port: &'a str,
    timeout: Duration,
    candidates: &'a BaudCandidates,
    index: usize,
}

impl<'a> SweepSession<'a> {
    pub fn new(port: &'a str, timeout: Duration, candidates: &'a BaudCandidates) -> Self {
        Self {
            port,
            timeout,
            candidates,
            index: 0,
        }
    }

    pub fn port(&self) -> &str {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_rate(&self) -> u32 {
        self.candidates.rate_at(self.index)
    }

    /// Move to the next candidate, wrapping at the end.
    pub fn advance(&mut self) {
        self.index = self.candidates.next_index(self.index);
    }
}
