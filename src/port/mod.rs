//! Port abstraction layer for serial communication.
//!
//! Provides traits and implementations for opening, polling and enumerating
//! serial ports, enabling dependency injection and testing via mocks.

pub mod error;
pub mod list;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use list::{StaticPortLister, SystemPortLister};
pub use mock::{MockAttempt, MockPortOpener, MockSerialPort};
pub use sync_port::*;
pub use traits::*;
