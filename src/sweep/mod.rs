//! Baud rate sweep.
//!
//! A sweep cycles a fixed list of candidate rates on one port, opening the
//! port at each rate for a bounded window and reporting any displayable
//! text received. It never ends on its own; the caller stops it through a
//! [`CancelToken`].

pub mod cancel;
pub mod candidates;
pub mod engine;
pub mod error;
pub mod session;

pub use cancel::{ArmGuard, CancelToken};
pub use candidates::{BaudCandidates, DEFAULT_BAUD_RATES};
pub use engine::{
    Attempt, CapturedText, ErrorPolicy, NullObserver, SweepEngine, SweepObserver, SweepReport,
    DEFAULT_POLL_INTERVAL,
};
pub use error::SweepError;
pub use session::SweepSession;
