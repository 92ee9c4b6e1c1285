//! Mock serial ports for testing.
//!
//! Provides a `MockSerialPort` that simulates a receive buffer without any
//! hardware, and a `MockPortOpener` that hands out scripted mock ports and
//! keeps a ledger of every open and close so tests can check that handles
//! are released.

use super::error::PortError;
use super::traits::{PortOpener, SerialPortAdapter};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Open/close bookkeeping shared between an opener and its ports.
#[derive(Debug, Default)]
struct Ledger {
    opens: AtomicUsize,
    closes: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

impl Ledger {
    fn opened(&self) {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn closed(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use baudprobe::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0", 9600);
/// port.enqueue_read(b"Hello");
///
/// assert_eq!(port.bytes_to_read().unwrap(), 5);
/// let mut buffer = [0u8; 5];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"Hello");
/// ```
pub struct MockSerialPort {
    name: String,
    baud_rate: u32,
    read_queue: VecDeque<u8>,
    /// Error returned once the queue has drained.
    fail_when_drained: Option<std::io::ErrorKind>,
    ledger: Option<Arc<Ledger>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name and rate.
    pub fn new(name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            name: name.into(),
            baud_rate,
            read_queue: VecDeque::new(),
            fail_when_drained: None,
            ledger: None,
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.read_queue.extend(data);
    }

    /// Make reads fail with `kind` after the queued bytes are consumed.
    pub fn fail_after_drain(&mut self, kind: std::io::ErrorKind) {
        self.fail_when_drained = Some(kind);
    }

    /// Get the number of bytes still queued.
    pub fn available_bytes(&self) -> usize {
        self.read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match self.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read > 0 {
            return Ok(bytes_read);
        }

        match self.fail_when_drained {
            Some(kind) => Err(PortError::Io(std::io::Error::new(kind, "mock read failure"))),
            None => Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "No data available",
            ))),
        }
    }

    fn bytes_to_read(&self) -> Result<usize, PortError> {
        // A pending failure looks like data so the caller goes on to read it.
        if self.read_queue.is_empty() && self.fail_when_drained.is_some() {
            return Ok(1);
        }
        Ok(self.read_queue.len())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Drop for MockSerialPort {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.take() {
            ledger.closed();
        }
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.baud_rate)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

/// What a `MockPortOpener` does on one call to `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAttempt {
    /// Opens fine, nothing is received.
    Silent,
    /// Opens fine and the receive buffer holds these bytes.
    Data(Vec<u8>),
    /// Opening fails as if the device did not exist.
    OpenFails,
    /// Opens, delivers these bytes, then reads fail.
    ReadFails(Vec<u8>),
}

/// A `PortOpener` that returns scripted mock ports.
///
/// Each call to `open` consumes the next scripted `MockAttempt`; once the
/// script runs out every open is `Silent`.
#[derive(Debug, Clone, Default)]
pub struct MockPortOpener {
    script: Arc<Mutex<VecDeque<MockAttempt>>>,
    requested: Arc<Mutex<Vec<u32>>>,
    ledger: Arc<Ledger>,
}

impl MockPortOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted attempt.
    pub fn then(self, attempt: MockAttempt) -> Self {
        self.script.lock().unwrap().push_back(attempt);
        self
    }

    /// Rates passed to `open`, in call order, including failed opens.
    pub fn requested_rates(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    /// Number of ports successfully opened.
    pub fn open_count(&self) -> usize {
        self.ledger.opens.load(Ordering::SeqCst)
    }

    /// Number of ports dropped.
    pub fn close_count(&self) -> usize {
        self.ledger.closes.load(Ordering::SeqCst)
    }

    /// Ports currently open.
    pub fn live_count(&self) -> usize {
        self.ledger.live.load(Ordering::SeqCst)
    }

    /// Highest number of ports that were open at the same time.
    pub fn max_live(&self) -> usize {
        self.ledger.max_live.load(Ordering::SeqCst)
    }
}

impl PortOpener for MockPortOpener {
    fn open(
        &self,
        port_name: &str,
        baud_rate: u32,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        self.requested.lock().unwrap().push(baud_rate);
        let attempt = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockAttempt::Silent);

        let mut port = MockSerialPort::new(port_name, baud_rate);
        match attempt {
            MockAttempt::Silent => {}
            MockAttempt::Data(bytes) => port.enqueue_read(&bytes),
            MockAttempt::OpenFails => return Err(PortError::not_found(port_name)),
            MockAttempt::ReadFails(bytes) => {
                port.enqueue_read(&bytes);
                port.fail_after_drain(std::io::ErrorKind::BrokenPipe);
            }
        }

        self.ledger.opened();
        port.ledger = Some(Arc::clone(&self.ledger));
        Ok(Box::new(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_read() {
        let mut port = MockSerialPort::new("MOCK0", 9600);
        port.enqueue_read(b"Hello");

        let mut buffer = [0u8; 10];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buffer[..n], b"Hello");
    }

    #[test]
    fn test_empty_read_would_block() {
        let mut port = MockSerialPort::new("MOCK0", 9600);
        let mut buffer = [0u8; 4];

        match port.read_bytes(&mut buffer) {
            Err(PortError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::WouldBlock),
            other => panic!("Expected WouldBlock error, got {:?}", other),
        }
        assert_eq!(port.bytes_to_read().unwrap(), 0);
    }

    #[test]
    fn test_partial_read() {
        let mut port = MockSerialPort::new("MOCK0", 9600);
        port.enqueue_read(b"Hello, World!");

        let mut buffer = [0u8; 5];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"Hello");
        assert_eq!(port.available_bytes(), 8);
    }

    #[test]
    fn test_fail_after_drain() {
        let mut port = MockSerialPort::new("MOCK0", 9600);
        port.enqueue_read(b"A");
        port.fail_after_drain(std::io::ErrorKind::BrokenPipe);

        let mut buffer = [0u8; 1];
        assert_eq!(port.read_bytes(&mut buffer).unwrap(), 1);
        assert_eq!(port.bytes_to_read().unwrap(), 1);
        assert!(matches!(port.read_bytes(&mut buffer), Err(PortError::Io(_))));
    }

    #[test]
    fn test_opener_script_and_ledger() {
        let opener = MockPortOpener::new()
            .then(MockAttempt::Data(b"hi".to_vec()))
            .then(MockAttempt::OpenFails);

        let port = opener.open("MOCK0", 9600).unwrap();
        assert_eq!(port.bytes_to_read().unwrap(), 2);
        assert_eq!(port.baud_rate(), 9600);
        assert_eq!(opener.live_count(), 1);
        drop(port);

        assert!(matches!(
            opener.open("MOCK0", 14400),
            Err(PortError::NotFound(_))
        ));

        let port = opener.open("MOCK0", 19200).unwrap();
        assert_eq!(port.bytes_to_read().unwrap(), 0);
        drop(port);

        assert_eq!(opener.requested_rates(), vec![9600, 14400, 19200]);
        assert_eq!(opener.open_count(), 2);
        assert_eq!(opener.close_count(), 2);
        assert_eq!(opener.live_count(), 0);
        assert_eq!(opener.max_live(), 1);
    }
}
