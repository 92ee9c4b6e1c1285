//! baudprobe library
//!
//! Finds the baud rate of an unknown serial device by cycling through
//! common rates and showing whatever readable text arrives at each one.
//!
//! # Modules
//!
//! - `filter`: which received bytes count as displayable text
//! - `sweep`: the cancellable open/read/advance loop over candidate rates
//! - `port`: serial port abstraction, real and mock implementations
//! - `menu`: the interactive text menu
//! - `terminal`: hand-off to an external terminal program
//! - `config`: TOML configuration with environment overrides
//! - `logging`: tracing subscriber setup
//! - `error`: top-level error type

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod menu;
pub mod port;
pub mod sweep;
pub mod terminal;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use menu::Menu;
pub use port::{
    MockAttempt, MockPortOpener, MockSerialPort, PortError, PortInfo, PortLister, PortOpener,
    SerialPortAdapter, SyncSerialPort,
};
pub use sweep::{
    BaudCandidates, CancelToken, CapturedText, ErrorPolicy, SweepEngine, SweepError,
    SweepObserver, SweepReport,
};
pub use terminal::{CommandLauncher, TerminalError, TerminalLauncher};

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
