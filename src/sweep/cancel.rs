//! Cooperative cancellation for sweeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag checked by the sweep engine.
///
/// Clones share state. The token also records whether a sweep is running
/// (armed), so an interrupt handler can tell "stop the sweep" apart from
/// "quit the program".
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    armed: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Whether a sweep currently holds an [`ArmGuard`].
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Mark a sweep as running until the guard is dropped.
    ///
    /// Clears any stale cancellation first.
    pub fn arm(&self) -> ArmGuard {
        self.reset();
        self.armed.store(true, Ordering::SeqCst);
        ArmGuard {
            token: self.clone(),
        }
    }
}

/// Keeps a [`CancelToken`] armed while alive.
#[derive(Debug)]
pub struct ArmGuard {
    token: CancelToken,
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        self.token.armed.store(false, Ordering::SeqCst);
        self.token.reset();
    }
}
