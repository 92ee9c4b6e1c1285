//! Interactive menu state and main loop.

use super::console::{clear_screen, ConsoleObserver};
use super::prompt::{self, MenuChoice};
use crate::config::Config;
use crate::port::{PortInfo, PortLister, PortOpener, SystemPortLister, SystemPortOpener};
use crate::sweep::{BaudCandidates, CancelToken, SweepEngine};
use crate::terminal::{CommandLauncher, TerminalLauncher};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{debug, warn};

const NO_PORT: &str = "No COM port selected. Please select a COM port.";
const NO_BAUD: &str = "No baud rate selected. Please run the baud rate detector.";

/// The interactive text menu.
///
/// Reads operator input from `input` and writes everything to `output`, so
/// the whole flow can be driven from tests with in-memory buffers.
pub struct Menu<R: BufRead, W: Write> {
    input: R,
    output: W,
    config: Config,
    candidates: BaudCandidates,
    cancel: CancelToken,
    lister: Box<dyn PortLister>,
    opener: Box<dyn PortOpener>,
    launcher: Box<dyn TerminalLauncher>,
    port: Option<String>,
    baud_rate: Option<u32>,
    clear: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Create a menu backed by the real serial subsystem and the configured
    /// terminal program.
    ///
    /// `config` is expected to be validated; an invalid rate list falls
    /// back to the defaults.
    pub fn new(input: R, output: W, config: Config, cancel: CancelToken) -> Self {
        let candidates = config.sweep.candidates().unwrap_or_else(|e| {
            warn!("Using default baud rates: {}", e);
            BaudCandidates::default()
        });
        let launcher = CommandLauncher::from_config(&config.terminal);

        Self {
            input,
            output,
            config,
            candidates,
            cancel,
            lister: Box::new(SystemPortLister),
            opener: Box::new(SystemPortOpener),
            launcher: Box::new(launcher),
            port: None,
            baud_rate: None,
            clear: false,
        }
    }

    pub fn with_lister(mut self, lister: impl PortLister + 'static) -> Self {
        self.lister = Box::new(lister);
        self
    }

    pub fn with_opener(mut self, opener: impl PortOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn with_launcher(mut self, launcher: impl TerminalLauncher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    /// Preselect a port.
    pub fn with_port(mut self, port: Option<String>) -> Self {
        self.port = port;
        self
    }

    /// Preselect a baud rate.
    pub fn with_baud_rate(mut self, baud_rate: Option<u32>) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Clear the screen between screens. Off by default.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    /// Run until the operator exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        loop {
            writeln!(self.output, "Serial Port Tool")?;
            writeln!(self.output, "1. Baud rate detector")?;
            writeln!(self.output, "2. Terminal")?;
            writeln!(self.output, "3. Set COM Port [{}]", display_or_none(&self.port))?;
            writeln!(
                self.output,
                "4. Set Baud Rate [{}]",
                display_or_none(&self.baud_rate)
            )?;
            writeln!(self.output, "5. Exit")?;

            let Some(line) = self.prompt("Enter your choice (1-5): ")? else {
                writeln!(self.output)?;
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Detect) => self.run_detector()?,
                Some(MenuChoice::Terminal) => self.run_terminal()?,
                Some(MenuChoice::SetPort) => self.select_port()?,
                Some(MenuChoice::SetBaudRate) => self.select_baud_rate()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                None => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    self.pause()?;
                }
            }

            self.clear_screen()?;
        }
    }

    /// Sweep the selected port until interrupted, then offer rate selection.
    pub fn run_detector(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        let Some(port) = self.port.clone() else {
            writeln!(self.output, "{}", NO_PORT)?;
            return self.pause();
        };

        let default = self.config.sweep.default_timeout_secs;
        let line = self
            .prompt(&format!("Enter timeout in seconds (default {}s): ", default))?
            .unwrap_or_default();
        let timeout = Duration::from_secs(prompt::parse_timeout(&line, default));

        writeln!(
            self.output,
            "The loop will now start. Press Ctrl+C at any time to exit."
        )?;
        self.output.flush()?;

        let result = {
            let engine = SweepEngine::new(
                self.opener.as_ref(),
                self.candidates.clone(),
                self.cancel.clone(),
            )
            .with_poll_interval(self.config.sweep.poll_interval())
            .with_error_policy(self.config.sweep.error_policy);

            let _armed = self.cancel.arm();
            let mut observer = ConsoleObserver::new(&mut self.output);
            let result = engine.run_sweep(&port, timeout, &mut observer);
            observer.finish()?;
            result
        };

        match result {
            Ok(report) => {
                debug!("Sweep finished: {:?}", report);
                writeln!(self.output)?;
                writeln!(
                    self.output,
                    "Sweep stopped after {} attempt(s).",
                    report.attempts
                )?;
                self.pause()?;
                self.select_baud_rate()
            }
            Err(e) => {
                writeln!(self.output)?;
                writeln!(self.output, "Sweep aborted: {}", e)?;
                self.pause()
            }
        }
    }

    /// Hand the selected port and rate to the terminal program.
    pub fn run_terminal(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        let Some(port) = self.port.clone() else {
            writeln!(self.output, "{}", NO_PORT)?;
            return self.pause();
        };
        let Some(baud_rate) = self.baud_rate else {
            writeln!(self.output, "{}", NO_BAUD)?;
            return self.pause();
        };

        self.output.flush()?;
        let result = {
            // Ctrl+C belongs to the terminal program while it runs.
            let _armed = self.cancel.arm();
            self.launcher.launch(&port, baud_rate)
        };

        if let Err(e) = result {
            warn!("Terminal hand-off failed: {}", e);
            writeln!(self.output, "{}", e)?;
            self.pause()?;
        }
        Ok(())
    }

    /// List ports and let the operator pick one (or none).
    pub fn select_port(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        let ports = match self.lister.list_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("Port enumeration failed: {}", e);
                writeln!(self.output, "{}", e)?;
                Vec::new()
            }
        };

        writeln!(self.output, "Available COM ports:")?;
        for (i, port) in ports.iter().enumerate() {
            writeln!(self.output, "{}: {}", i + 1, describe_port(port))?;
        }
        let none = ports.len() + 1;
        writeln!(self.output, "{}: None", none)?;

        let line = self
            .prompt(&format!("Select a COM port (1-{}): ", none))?
            .unwrap_or_default();
        self.port = prompt::parse_port_choice(&line, &ports);
        debug!("Selected port: {:?}", self.port);
        Ok(())
    }

    /// List candidate rates and let the operator pick one (or none).
    pub fn select_baud_rate(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        writeln!(
            self.output,
            "Select the correct baud rate or choose 'None' to exit:"
        )?;
        for (i, rate) in self.candidates.as_slice().iter().enumerate() {
            writeln!(self.output, "{}: {}", i + 1, rate)?;
        }
        let none = self.candidates.len() + 1;
        writeln!(self.output, "{}: None", none)?;

        let line = self
            .prompt(&format!("Enter your choice (1-{}): ", none))?
            .unwrap_or_default();
        self.baud_rate = prompt::parse_baud_choice(&line, &self.candidates);
        debug!("Selected baud rate: {:?}", self.baud_rate);
        Ok(())
    }

    /// Print `text` and read one line. `None` means end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn pause(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.prompt("Press Enter to continue...")?;
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        if self.clear {
            clear_screen(&mut self.output)?;
        }
        Ok(())
    }
}

fn display_or_none<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

fn describe_port(port: &PortInfo) -> String {
    match &port.description {
        Some(desc) => format!("{} ({})", port.name, desc),
        None => port.name.clone(),
    }
}
