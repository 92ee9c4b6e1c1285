//! Terminal hand-off.
//!
//! Once a rate is known, interactive control of the port is given to an
//! external terminal program. The program and its arguments come from the
//! `[terminal]` config section; `{port}` and `{baud}` in the arguments are
//! replaced before spawning.

use crate::config::TerminalConfig;
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TerminalError {
    /// The program could not be started (missing, not executable, ...).
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure.
    #[error("'{program}' exited with {status}")]
    Exited { program: String, status: ExitStatus },
}

/// Launches an interactive terminal on a port.
pub trait TerminalLauncher {
    /// Run the terminal on `port` at `baud_rate`, returning when it exits.
    fn launch(&self, port: &str, baud_rate: u32) -> Result<(), TerminalError>;
}

/// Spawns the configured external program and waits for it.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &TerminalConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// Arguments with placeholders substituted.
    pub fn render_args(&self, port: &str, baud_rate: u32) -> Vec<String> {
        let baud = baud_rate.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{port}", port).replace("{baud}", &baud))
            .collect()
    }
}

impl TerminalLauncher for CommandLauncher {
    fn launch(&self, port: &str, baud_rate: u32) -> Result<(), TerminalError> {
        let args = self.render_args(port, baud_rate);
        info!("Handing {} at {} baud to {}", port, baud_rate, self.program);
        debug!("Terminal command: {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| TerminalError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(TerminalError::Exited {
                program: self.program.clone(),
                status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let launcher = CommandLauncher::from_config(&TerminalConfig::default());
        assert_eq!(
            launcher.render_args("/dev/ttyUSB0", 115200),
            vec!["/dev/ttyUSB0".to_string(), "115200".to_string()]
        );

        let launcher = CommandLauncher::new(
            "picocom",
            vec!["-b".into(), "{baud}".into(), "--".into(), "{port}".into()],
        );
        assert_eq!(
            launcher.render_args("COM3", 9600),
            vec!["-b", "9600", "--", "COM3"]
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let launcher = CommandLauncher::new("baudprobe-no-such-terminal-xyz", vec![]);
        let err = launcher.launch("COM3", 9600).unwrap_err();
        assert!(matches!(err, TerminalError::Spawn { .. }));
    }
}
