//! gcmt - GC monitor terminal.
//!
//! Runs the gcmon commands against a simulated host runtime. It uses clap for
//! argument parsing and dispatches to the matching command handler.

mod commands;
mod config;
mod console;
mod error;
mod host;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_monitor, run_repl, run_snapshot, MonitorArgs, ReplArgs, SnapshotArgs};
use config::Config;
use error::{GcmtError, Result};

/// gcmt - Garbage collection monitor terminal
///
/// gcmt boots a simulated runtime and answers the `gc` and `gcmonitor`
/// commands against it.
#[derive(Parser, Debug)]
#[command(name = "gcmt")]
#[command(author = "Gcmon Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Garbage collection monitor terminal", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "GCMT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GCMT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "GCMT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the gcmt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print collector statistics since startup
    ///
    /// Runs the simulated host for the warm-up period, then answers the
    /// `gc` command once.
    Snapshot(SnapshotCommand),

    /// Stream per-collection reports for a while
    ///
    /// Toggles the GC monitor on, lets the host collect for the given
    /// duration, and toggles it off again.
    Monitor(MonitorCommand),

    /// Read commands from standard input
    ///
    /// Each line is dispatched as a command; `help` lists them and
    /// `exit`, `quit` or end of input ends the session.
    Repl(ReplCommand),
}

/// Arguments for the snapshot subcommand.
#[derive(Parser, Debug)]
struct SnapshotCommand {
    /// Milliseconds of simulated activity before the snapshot
    #[arg(short, long, default_value_t = 0)]
    warmup_ms: u64,

    /// Print collector summaries as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the monitor subcommand.
#[derive(Parser, Debug)]
struct MonitorCommand {
    /// Milliseconds to keep the monitor running
    #[arg(short, long, default_value_t = 2000)]
    duration_ms: u64,
}

/// Arguments for the repl subcommand.
#[derive(Parser, Debug)]
struct ReplCommand {
    /// Keep the host idle instead of collecting in the background
    #[arg(long)]
    paused: bool,
}

/// Main entry point for the gcmt CLI.
///
/// Parses command-line arguments, loads configuration, initializes logging,
/// and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose || config.verbose, cli.no_color)?;

    execute_command(cli.command, config)
}

/// Initialize the logging system.
///
/// Logs go to stderr so report text on stdout stays clean. Records emitted
/// through the `log` facade by gcmon are forwarded as well.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(verbose);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| GcmtError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults, then apply environment
/// overrides and validate.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    }
    .with_env_overrides();

    config.validate()?;
    Ok(config)
}

/// Execute the selected command.
fn execute_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Snapshot(args) => run_snapshot(
            SnapshotArgs {
                warmup_ms: args.warmup_ms,
                json: args.json,
            },
            &config,
        ),
        Commands::Monitor(args) => run_monitor(
            MonitorArgs {
                duration_ms: args.duration_ms,
            },
            &config,
        ),
        Commands::Repl(args) => run_repl(ReplArgs { paused: args.paused }, &config),
    }
}
