//! Console rendering for the menu and sweep output.

use crate::sweep::{CapturedText, SweepError, SweepObserver};
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use std::io::{self, Write};

/// Printed after every attempt.
pub const SEPARATOR: &str =
    "##################################################################";

/// Clear the terminal and home the cursor.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Prints sweep progress to a writer.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`ConsoleObserver::finish`].
pub struct ConsoleObserver<'w, W: Write> {
    out: &'w mut W,
    error: Option<io::Error>,
}

impl<'w, W: Write> ConsoleObserver<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out, error: None }
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = f(&mut *self.out).and_then(|_| self.out.flush()) {
            self.error = Some(e);
        }
    }

    /// Surface the first write error, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: Write> SweepObserver for ConsoleObserver<'_, W> {
    fn attempt_started(&mut self, baud_rate: u32) {
        self.emit(|out| writeln!(out, "Current baud rate: {}", baud_rate));
    }

    fn captured(&mut self, _baud_rate: u32, text: &CapturedText) {
        self.emit(|out| writeln!(out, "{}", text));
    }

    fn attempt_finished(&mut self, _baud_rate: u32) {
        self.emit(|out| writeln!(out, "\n{}\n", SEPARATOR));
    }

    fn attempt_failed(&mut self, error: &SweepError) {
        self.emit(|out| writeln!(out, "Error: {}\n\n{}\n", error, SEPARATOR));
    }
}
