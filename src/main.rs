use baudprobe::config::ConfigLoader;
use baudprobe::error::{AppError, AppResult};
use baudprobe::logging;
use baudprobe::port::{PortLister, SystemPortLister};
use baudprobe::sweep::CancelToken;
use baudprobe::Menu;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tracing::{debug, warn};

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Find the baud rate of a serial device by sweeping common rates.",
    long_about = "Opens the selected serial port at each candidate baud rate in turn and prints any readable text received. Stop the sweep with Ctrl+C once the output looks right, record the rate, and open a terminal on the port."
)]
struct Args {
    /// Configuration file (defaults to the standard search path).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Preselect a serial port (config aliases are resolved).
    #[arg(short, long)]
    port: Option<String>,

    /// Preselect a baud rate for the terminal.
    #[arg(short, long, value_name = "RATE", value_parser = clap::value_parser!(u32).range(1..))]
    baud: Option<u32>,

    /// Default seconds per attempt offered at the timeout prompt.
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// List available serial ports and exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("baudprobe: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> AppResult<()> {
    let loader = match args.config {
        Some(ref path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();
    if let Some(secs) = args.timeout {
        config.sweep.default_timeout_secs = secs;
        config.validate()?;
    }

    logging::init(&config.logging)?;

    if args.list {
        return list_ports();
    }

    let port = args
        .port
        .or_else(|| config.serial.default_port.clone())
        .map(|p| config.serial.resolve_port(&p));
    let baud_rate = args.baud;

    let cancel = CancelToken::new();
    tokio::spawn(watch_interrupts(cancel.clone()));

    let menu_task = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let clear = stdout.is_terminal();
        let mut menu = Menu::new(io::stdin().lock(), stdout, config, cancel)
            .with_port(port)
            .with_baud_rate(baud_rate)
            .with_clear_screen(clear);
        menu.run()
    });

    match menu_task.await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => Err(AppError::Task(e.to_string())),
    }
}

fn list_ports() -> AppResult<()> {
    let ports = SystemPortLister.list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    }
    for port in ports {
        match port.description {
            Some(desc) => println!("{}\t{}", port.name, desc),
            None => println!("{}", port.name),
        }
    }
    Ok(())
}

// --- Ctrl+C Handler ---
// While a sweep or terminal session holds the token, Ctrl+C stops it.
// Otherwise it quits the program.
async fn watch_interrupts(cancel: CancelToken) {
    loop {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        if cancel.is_armed() {
            debug!("Interrupt received, cancelling");
            cancel.cancel();
        } else {
            println!("\nGoodbye!");
            std::process::exit(0);
        }
    }
}
