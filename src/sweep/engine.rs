//! The sweep engine.
//!
//! `SweepEngine` opens the target port at each candidate rate in turn,
//! polls it for the attempt window, keeps the displayable bytes, and hands
//! them to a `SweepObserver`. It loops until its `CancelToken` fires.

use super::cancel::CancelToken;
use super::candidates::BaudCandidates;
use super::error::SweepError;
use super::session::SweepSession;
use crate::filter;
use crate::port::{PortError, PortOpener};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default sleep between polls when no byte is waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// What a sweep does when an attempt fails to open or read the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// End the sweep and return the error.
    #[default]
    Abort,
    /// Report the error, wait out the attempt window, and move on.
    Continue,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!("unknown error policy '{other}'")),
        }
    }
}

/// Filtered text captured during one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedText(String);

impl CapturedText {
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CapturedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub baud_rate: u32,
    pub text: CapturedText,
    /// The attempt was cut short by cancellation.
    pub cancelled: bool,
}

/// Summary returned when a sweep is cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Attempts that opened the port and ran (including a cancelled one).
    pub attempts: usize,
    /// Attempts that failed under `ErrorPolicy::Continue`.
    pub errors: usize,
    /// Rate of the last attempt started.
    pub last_baud_rate: Option<u32>,
}

/// Receives progress from a running sweep.
///
/// All methods default to doing nothing.
pub trait SweepObserver {
    /// An attempt at `baud_rate` is about to open the port.
    fn attempt_started(&mut self, _baud_rate: u32) {}

    /// A finished attempt captured displayable text.
    fn captured(&mut self, _baud_rate: u32, _text: &CapturedText) {}

    /// An attempt ran its full window.
    fn attempt_finished(&mut self, _baud_rate: u32) {}

    /// An attempt failed under `ErrorPolicy::Continue`.
    ///
    /// Under `ErrorPolicy::Abort` the error is returned from `run_sweep`
    /// instead.
    fn attempt_failed(&mut self, _error: &SweepError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl SweepObserver for NullObserver {}

/// Drives attempts across a candidate list.
pub struct SweepEngine<'a> {
    opener: &'a dyn PortOpener,
    candidates: BaudCandidates,
    poll_interval: Duration,
    policy: ErrorPolicy,
    cancel: CancelToken,
}

impl<'a> SweepEngine<'a> {
    pub fn new(opener: &'a dyn PortOpener, candidates: BaudCandidates, cancel: CancelToken) -> Self {
        Self {
            opener,
            candidates,
            poll_interval: DEFAULT_POLL_INTERVAL,
            policy: ErrorPolicy::default(),
            cancel,
        }
    }

    /// Set the sleep between polls. Zero is raised to one millisecond.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Open `port` at `baud_rate` and collect displayable bytes until
    /// `timeout` elapses or the sweep is cancelled.
    ///
    /// The port is closed before this returns, on every path.
    pub fn run_attempt(
        &self,
        port: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Attempt, SweepError> {
        let mut handle = self
            .opener
            .open(port, baud_rate)
            .map_err(|e| SweepError::attempt(port, baud_rate, e))?;

        let start = Instant::now();
        let mut text = CapturedText::default();
        let mut byte = [0u8; 1];

        let outcome = loop {
            if self.cancel.is_cancelled() {
                break Ok(true);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                break Ok(false);
            }

            let waiting = match handle.bytes_to_read() {
                Ok(n) => n,
                Err(e) => break Err(e),
            };
            if waiting == 0 {
                thread::sleep(self.poll_interval.min(timeout - elapsed));
                continue;
            }

            match handle.read_bytes(&mut byte) {
                Ok(0) => {}
                Ok(_) => {
                    if let Some(c) = filter::displayable(byte[0]) {
                        text.push(c);
                    }
                }
                Err(e) if is_transient(&e) => {}
                Err(e) => break Err(e),
            }
        };

        drop(handle);

        match outcome {
            Ok(cancelled) => {
                debug!(
                    "Attempt at {} baud on {} captured {} chars{}",
                    baud_rate,
                    port,
                    text.len(),
                    if cancelled { " (cancelled)" } else { "" }
                );
                Ok(Attempt {
                    baud_rate,
                    text,
                    cancelled,
                })
            }
            Err(e) => Err(SweepError::attempt(port, baud_rate, e)),
        }
    }

    /// Cycle through the candidate rates on `port` until cancelled.
    ///
    /// Returns `Ok` only on cancellation. Under `ErrorPolicy::Abort` the
    /// first attempt error is returned.
    pub fn run_sweep(
        &self,
        port: &str,
        timeout: Duration,
        observer: &mut dyn SweepObserver,
    ) -> Result<SweepReport, SweepError> {
        let mut session = SweepSession::new(port, timeout, &self.candidates);
        let mut report = SweepReport::default();

        info!(
            "Sweeping {} over {} rates, {:?} per attempt",
            session.port(),
            self.candidates.len(),
            session.timeout()
        );

        while !self.cancel.is_cancelled() {
            let baud_rate = session.current_rate();
            report.last_baud_rate = Some(baud_rate);
            observer.attempt_started(baud_rate);
            let started = Instant::now();

            match self.run_attempt(session.port(), baud_rate, session.timeout()) {
                Ok(attempt) => {
                    report.attempts += 1;
                    if attempt.cancelled {
                        break;
                    }
                    if !attempt.text.is_empty() {
                        observer.captured(baud_rate, &attempt.text);
                    }
                    observer.attempt_finished(baud_rate);
                }
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        warn!("Sweep aborted: {}", e);
                        return Err(e);
                    }
                    ErrorPolicy::Continue => {
                        warn!("Attempt failed, continuing: {}", e);
                        report.errors += 1;
                        observer.attempt_failed(&e);
                        self.wait_out(started, session.timeout());
                    }
                },
            }

            session.advance();
        }

        info!(
            "Sweep of {} cancelled after {} attempts",
            port, report.attempts
        );
        Ok(report)
    }

    /// Sleep until `timeout` has passed since `started`, or cancellation.
    fn wait_out(&self, started: Instant, timeout: Duration) {
        loop {
            if self.cancel.is_cancelled() {
                return;
            }
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return;
            }
            thread::sleep(self.poll_interval.min(timeout - elapsed));
        }
    }
}

impl fmt::Debug for SweepEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SweepEngine")
            .field("candidates", &self.candidates)
            .field("poll_interval", &self.poll_interval)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Read errors that only mean "nothing there right now".
fn is_transient(err: &PortError) -> bool {
    match err {
        PortError::Io(e) => matches!(
            e.kind(),
            std::io::ErrorKind::WouldBlock
                | std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::Interrupted
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{MockAttempt, MockPortOpener};

    const TICK: Duration = Duration::from_millis(1);

    #[test]
    fn test_attempt_filters_bytes() {
        let opener = MockPortOpener::new().then(MockAttempt::Data(vec![0x41, 0x0A, 0x00, 0x42]));
        let engine = SweepEngine::new(&opener, BaudCandidates::default(), CancelToken::new())
            .with_poll_interval(TICK);

        let attempt = engine
            .run_attempt("MOCK0", 9600, Duration::from_millis(20))
            .unwrap();
        assert_eq!(attempt.text.as_str(), "A\nB");
        assert!(!attempt.cancelled);
        assert_eq!(opener.close_count(), 1);
    }

    #[test]
    fn test_attempt_open_failure_is_attempt_error() {
        let opener = MockPortOpener::new().then(MockAttempt::OpenFails);
        let engine = SweepEngine::new(&opener, BaudCandidates::default(), CancelToken::new());

        let err = engine
            .run_attempt("MOCK0", 19200, Duration::from_millis(10))
            .unwrap_err();
        assert_eq!(err.baud_rate(), Some(19200));
        assert_eq!(opener.open_count(), 0);
    }

    #[test]
    fn test_attempt_read_failure_releases_port() {
        let opener = MockPortOpener::new().then(MockAttempt::ReadFails(b"ok".to_vec()));
        let engine = SweepEngine::new(&opener, BaudCandidates::default(), CancelToken::new())
            .with_poll_interval(TICK);

        let err = engine
            .run_attempt("MOCK0", 9600, Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, SweepError::Attempt { source: PortError::Io(_), .. }));
        assert_eq!(opener.open_count(), 1);
        assert_eq!(opener.close_count(), 1);
    }

    #[test]
    fn test_pre_cancelled_attempt_returns_immediately() {
        let opener = MockPortOpener::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let engine = SweepEngine::new(&opener, BaudCandidates::default(), cancel);

        let start = Instant::now();
        let attempt = engine
            .run_attempt("MOCK0", 9600, Duration::from_secs(5))
            .unwrap();
        assert!(attempt.cancelled);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(opener.live_count(), 0);
    }

    #[test]
    fn test_error_policy_parse() {
        assert_eq!("abort".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Abort);
        assert_eq!(" Continue ".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Continue);
        assert!("retry".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn test_transient_errors() {
        let would_block = PortError::Io(std::io::Error::from(std::io::ErrorKind::WouldBlock));
        let broken = PortError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(is_transient(&would_block));
        assert!(!is_transient(&broken));
        assert!(!is_transient(&PortError::not_found("x")));
    }
}
