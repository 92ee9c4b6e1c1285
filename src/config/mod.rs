//! Configuration for baudprobe.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the first of these that exists:
//!
//! 1. The `--config` command-line path
//! 2. `BAUDPROBE_CONFIG` environment variable (explicit path)
//! 3. `./baudprobe.toml` (current directory)
//! 4. `~/.config/baudprobe/baudprobe.toml` (XDG on Linux/macOS)
//! 5. `%APPDATA%\baudprobe\baudprobe.toml` (Windows)
//! 6. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `BAUDPROBE_<SECTION>_<KEY>`:
//! - `BAUDPROBE_SWEEP_TIMEOUT_SECS=3`
//! - `BAUDPROBE_SWEEP_BAUD_RATES=9600,115200`
//! - `BAUDPROBE_SWEEP_ERROR_POLICY=continue`
//! - `BAUDPROBE_SERIAL_DEFAULT_PORT=/dev/ttyUSB0`
//! - `BAUDPROBE_TERMINAL_PROGRAM=picocom`
//! - `BAUDPROBE_LOGGING_LEVEL=debug`
//!
//! # Example
//!
//! ```toml
//! [sweep]
//! baud_rates = [9600, 19200, 115200]
//! default_timeout_secs = 3
//! error_policy = "continue"
//!
//! [terminal]
//! program = "picocom"
//! args = ["-b", "{baud}", "{port}"]
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig, SweepConfig, TerminalConfig};
