// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! ReviewBar CLI - pending-review badge for Phabricator and Bugzilla.
//!
//! # Examples
//!
//! ```bash
//! # One-shot: run a cycle and print the snapshot
//! reviewbar
//!
//! # JSON output
//! reviewbar check --format json --pretty
//!
//! # Run the badge daemon at the configured interval
//! reviewbar watch
//!
//! # Daemon with a 2-minute interval
//! reviewbar watch --interval 2
//!
//! # Configure the Bugzilla API key (a running daemon picks it up)
//! reviewbar config set-bugzilla-key KEY
//!
//! # List providers and their configuration state
//! reviewbar providers
//! ```

mod commands;
mod engine;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{check, config, providers, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// ReviewBar CLI - pending-review badge monitoring.
#[derive(Parser)]
#[command(name = "reviewbar")]
#[command(about = "Pending-review badge for Phabricator and Bugzilla")]
#[command(version)]
#[command(author = "ReviewBar Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'check' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one update cycle and print the snapshot (default).
    #[command(visible_alias = "c")]
    Check,

    /// Run the badge daemon: poll on the configured interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// List providers and their configuration state.
    Providers,

    /// Read or change persisted settings.
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Output format.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// Entry Point
// ============================================================================

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        None | Some(Commands::Check) => check::run(&cli).await,
        Some(Commands::Watch(args)) => watch::run(args).await,
        Some(Commands::Providers) => providers::run(&cli).await,
        Some(Commands::Config(command)) => config::run(command).await,
    }
}
