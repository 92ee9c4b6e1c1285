//! Text menu around the sweep engine.
//!
//! Port selection, the timeout prompt, the sweep itself, baud rate
//! selection and the terminal hand-off, in the order an operator uses them.

mod app;
pub mod console;
pub mod prompt;

pub use app::Menu;
pub use console::{clear_screen, ConsoleObserver, SEPARATOR};
pub use prompt::MenuChoice;
