// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! TokenServer CLI - serves cached Claude usage statistics over local HTTP.
//!
//! # Examples
//!
//! ```bash
//! # Serve on 0.0.0.0:8765 (default)
//! tokenserver
//!
//! # Serve on loopback only with a one-minute cache
//! tokenserver serve --host 127.0.0.1 --cache-ttl 60
//!
//! # One-shot fresh fetch
//! tokenserver usage --pretty
//!
//! # Is a credential available?
//! tokenserver check
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, serve, usage};

// ============================================================================
// CLI Definition
// ============================================================================

/// TokenServer - local HTTP API for Claude usage statistics.
#[derive(Parser)]
#[command(name = "tokenserver")]
#[command(about = "Local HTTP API exposing cached Claude usage statistics")]
#[command(long_about = r#"
TokenServer reads the Claude Code OAuth token from the OS credential store,
queries the Anthropic usage endpoint and serves the result as JSON.

Endpoints:
  GET /usage         Cached usage (refreshed after the cache TTL)
  GET /usage/fresh   Always fetches from upstream
  GET /health        Liveness probe

Examples:
  tokenserver                          # Serve on 0.0.0.0:8765
  tokenserver serve --port 9000        # Different port
  tokenserver usage --pretty           # One-shot fetch
  tokenserver check                    # Credential present?
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'serve' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (JSON).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default if no command specified).
    #[command(visible_alias = "s")]
    Serve(serve::ServeArgs),

    /// Fetch usage once from upstream and print it.
    #[command(visible_alias = "u")]
    Usage(usage::UsageArgs),

    /// Check whether a usable credential is present.
    Check,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Credential missing or unusable.
    CredentialMissing = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tokenserver=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("tokenserver=info,tower_http=info,warn")
        }
    })
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Serve(args)) => serve::run(args, &cli).await,
        Some(Commands::Usage(args)) => usage::run(args, &cli).await,
        Some(Commands::Check) => check::run(&cli).await,
        None => serve::run(&serve::ServeArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
