//! Shared test utilities.
//!
//! - An opener that fires the cancel token after a set number of opens,
//!   standing in for the operator pressing Ctrl+C
//! - An observer that records sweep progress
//! - A terminal launcher that records hand-offs instead of spawning

#![allow(dead_code)]

use baudprobe::port::{MockPortOpener, PortError, PortOpener, SerialPortAdapter};
use baudprobe::sweep::{CancelToken, CapturedText, SweepError, SweepObserver};
use baudprobe::terminal::{TerminalError, TerminalLauncher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Wraps a `MockPortOpener` and cancels `cancel` on the `after`-th open.
///
/// The cancelled attempt still opens (and must release) its port.
#[derive(Debug, Clone)]
pub struct CancellingOpener {
    pub inner: MockPortOpener,
    cancel: CancelToken,
    after: usize,
    calls: Arc<AtomicUsize>,
    opened_at: Arc<Mutex<Vec<Instant>>>,
}

impl CancellingOpener {
    pub fn new(inner: MockPortOpener, cancel: CancelToken, after: usize) -> Self {
        Self {
            inner,
            cancel,
            after,
            calls: Arc::new(AtomicUsize::new(0)),
            opened_at: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// When each `open` call happened.
    pub fn open_times(&self) -> Vec<Instant> {
        self.opened_at.lock().unwrap().clone()
    }
}

impl PortOpener for CancellingOpener {
    fn open(
        &self,
        port_name: &str,
        baud_rate: u32,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        self.opened_at.lock().unwrap().push(Instant::now());
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.after {
            self.cancel.cancel();
        }
        self.inner.open(port_name, baud_rate)
    }
}

/// Records everything a sweep reports.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<u32>,
    pub captured: Vec<(u32, String)>,
    pub finished: Vec<u32>,
    pub failed: Vec<String>,
}

impl SweepObserver for RecordingObserver {
    fn attempt_started(&mut self, baud_rate: u32) {
        self.started.push(baud_rate);
    }

    fn captured(&mut self, baud_rate: u32, text: &CapturedText) {
        self.captured.push((baud_rate, text.as_str().to_string()));
    }

    fn attempt_finished(&mut self, baud_rate: u32) {
        self.finished.push(baud_rate);
    }

    fn attempt_failed(&mut self, error: &SweepError) {
        self.failed.push(error.to_string());
    }
}

/// Records terminal hand-offs.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    launches: Arc<Mutex<Vec<(String, u32)>>>,
}

impl RecordingLauncher {
    pub fn launches(&self) -> Vec<(String, u32)> {
        self.launches.lock().unwrap().clone()
    }
}

impl TerminalLauncher for RecordingLauncher {
    fn launch(&self, port: &str, baud_rate: u32) -> Result<(), TerminalError> {
        self.launches
            .lock()
            .unwrap()
            .push((port.to_string(), baud_rate));
        Ok(())
    }
}

/// Operator input: one line per entry.
pub fn input(lines: &[&str]) -> std::io::Cursor<Vec<u8>> {
    let mut text = lines.join("\n");
    text.push('\n');
    std::io::Cursor::new(text.into_bytes())
}
