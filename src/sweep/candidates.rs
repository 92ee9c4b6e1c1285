//! Candidate baud rates.

use super::error::SweepError;

/// Rates tried by default, in sweep order.
pub const DEFAULT_BAUD_RATES: &[u32] = &[9600, 14400, 19200, 38400, 57600, 115200];

/// An ordered, non-empty list of baud rates to cycle through.
///
/// The list is fixed once built; a sweep walks it cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaudCandidates {
    rates: Vec<u32>,
}

impl BaudCandidates {
    /// Build a candidate list. Fails if `rates` is empty or contains zero.
    pub fn new(rates: Vec<u32>) -> Result<Self, SweepError> {
        if rates.is_empty() {
            return Err(SweepError::InvalidCandidates(
                "at least one baud rate is required".to_string(),
            ));
        }
        if rates.contains(&0) {
            return Err(SweepError::InvalidCandidates(
                "baud rates must be positive".to_string(),
            ));
        }
        Ok(Self { rates })
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rate at `index`, wrapping around the end of the list.
    pub fn rate_at(&self, index: usize) -> u32 {
        self.rates[index % self.rates.len()]
    }

    /// Index following `index` in cyclic order.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.rates.len()
    }

    pub fn contains(&self, baud_rate: u32) -> bool {
        self.rates.contains(&baud_rate)
    }
}

impl Default for BaudCandidates {
    fn default() -> Self {
        Self {
            rates: DEFAULT_BAUD_RATES.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for BaudCandidates {
    type Error = SweepError;

    fn try_from(rates: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(rates)
    }
}
