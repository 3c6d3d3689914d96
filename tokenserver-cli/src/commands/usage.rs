//! Usage command - one-shot fetch printed as JSON.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::{build_service, load_config};
use crate::Cli;

/// Arguments for the usage command.
#[derive(Args, Default)]
pub struct UsageArgs {
    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Runs the usage command. Always bypasses the cache.
pub async fn run(args: &UsageArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    config.validate().context("Invalid configuration")?;

    let service = build_service(&config)?;
    let result = service.get_usage(true).await?;
    debug!(fetched_at = %result.fetched_at, "Fetched usage");

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}
