//! Command-line interface module for videolog.
//!
//! Parses the process arguments, sets up logging, loads the configuration
//! and hands over to the interactive [`Shell`].

use crate::config::Config;
use crate::output::OutputFormatter;
use crate::rename::RenameInterrupt;
use crate::shell::Shell;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// videolog - sort, date-bucket, triage and rename video logging footage
#[derive(Parser, Debug)]
#[command(name = "videolog")]
#[command(version)]
#[command(about = "Interactive shell that organizes a folder of video footage", long_about = None)]
pub struct Args {
    /// Directory to start in (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Path to a configuration file (TOML format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with the installation guard disabled
    #[arg(long)]
    pub sudo: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Runs the interactive shell on standard input.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use videolog::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["videolog", "/footage/day1"]);
/// if let Err(e) = run_cli(args) {
///     eprintln!("Error: {:#}", e);
/// }
/// ```
pub fn run_cli(args: Args) -> Result<()> {
    let directory = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let directory = directory
        .canonicalize()
        .with_context(|| format!("Cannot open directory {}", directory.display()))?;
    if !directory.is_dir() {
        anyhow::bail!("{} is not a directory", directory.display());
    }
    let config =
        Config::load(args.config.as_deref(), &directory).context("Failed to load configuration")?;
    debug!(dir = %directory.display(), ?config, "starting shell");

    let stdin = io::stdin();
    let show_progress = stdin.is_terminal();
    let shell = Shell::new(stdin.lock(), directory, config)
        .context("Invalid configuration")?
        .with_sudo(args.sudo)
        .with_progress(show_progress);

    let interrupt = RenameInterrupt::new();
    let handler = interrupt.clone();
    ctrlc::set_handler(move || {
        if handler.trigger() {
            OutputFormatter::warning("Stopping file renaming, press Enter to get back to the shell.");
        } else {
            std::process::exit(130);
        }
    })
    .context("Failed to install the Ctrl-C handler")?;

    let mut shell = shell.with_interrupt(interrupt);
    shell.run().context("Failed to read from standard input")?;
    Ok(())
}
