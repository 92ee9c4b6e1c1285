//! Printable byte filter.
//!
//! Decides which raw bytes received at a candidate baud rate are worth
//! showing to the operator. At a wrong rate most bytes decode to control
//! characters or high-bit garbage; those are dropped silently.

/// Line feed.
pub const LF: u8 = 0x0A;

/// Carriage return.
pub const CR: u8 = 0x0D;

/// Returns the character for `byte` if it is displayable.
///
/// A byte is displayable if it is printable ASCII (`0x20..=0x7E`), a line
/// feed, or a carriage return. Every other value maps to `None`.
#[inline]
pub fn displayable(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | LF | CR => Some(byte as char),
        _ => None,
    }
}

/// Returns `true` if `byte` passes [`displayable`].
#[inline]
pub fn is_displayable(byte: u8) -> bool {
    displayable(byte).is_some()
}

/// Filters a whole buffer, keeping displayable bytes in order.
pub fn filter_bytes(bytes: &[u8]) -> String {
    bytes.iter().copied().filter_map(displayable).collect()
}
