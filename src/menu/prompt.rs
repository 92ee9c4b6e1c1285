//! Parsing of operator input.
//!
//! Every parser is total: bad input falls back to a default or to "no
//! selection" instead of failing.

use crate::port::PortInfo;
use crate::sweep::BaudCandidates;

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Detect,
    Terminal,
    SetPort,
    SetBaudRate,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Detect),
            "2" => Some(Self::Terminal),
            "3" => Some(Self::SetPort),
            "4" => Some(Self::SetBaudRate),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Seconds per attempt. Blank, non-numeric or zero input yields `default`.
pub fn parse_timeout(input: &str, default: u64) -> u64 {
    match input.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => default,
    }
}

/// 1-based selection from a numbered list of `len` entries followed by a
/// "None" entry. Returns the 0-based index of a real entry.
fn parse_list_choice(input: &str, len: usize) -> Option<usize> {
    let choice = input.trim().parse::<usize>().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}

/// Port picked from `ports`; `None` for the "None" entry or bad input.
pub fn parse_port_choice(input: &str, ports: &[PortInfo]) -> Option<String> {
    parse_list_choice(input, ports.len()).map(|i| ports[i].name.clone())
}

/// Rate picked from `candidates`; `None` for the "None" entry or bad input.
pub fn parse_baud_choice(input: &str, candidates: &BaudCandidates) -> Option<u32> {
    parse_list_choice(input, candidates.len()).map(|i| candidates.as_slice()[i])
}
