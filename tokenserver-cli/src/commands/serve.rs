//! Serve command - run the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokenserver_http::{bind, build_app, serve, AppState, AVAILABLE_ENDPOINTS};
use tokenserver_store::ServerConfig;
use tracing::{info, warn};

use super::{build_service, load_config};
use crate::Cli;

/// Arguments for the serve command. Unset flags keep the configured value.
#[derive(Args, Default)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Cache time-to-live in seconds.
    #[arg(long)]
    pub cache_ttl: Option<u64>,

    /// Read credentials from this JSON file instead of the keychain.
    #[arg(long)]
    pub credentials_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Layers the flags over `config`.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl_secs = ttl;
        }
        if let Some(path) = &self.credentials_file {
            config.credentials_file = Some(path.clone());
        }
    }
}

/// Runs the serve command.
pub async fn run(args: &ServeArgs, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let service = Arc::new(build_service(&config)?);
    let app = build_app(AppState::new(service));

    let addr = config.bind_addr();
    let listener = bind(&addr).await?;

    log_banner(&config);

    serve(listener, app, shutdown_signal()).await?;
    Ok(())
}

fn log_banner(config: &ServerConfig) {
    info!(addr = %config.bind_addr(), "TokenServer listening");
    for endpoint in AVAILABLE_ENDPOINTS {
        info!("  GET http://{}{}", config.bind_addr(), endpoint);
    }
    info!(ttl_secs = config.cache_ttl_secs, "Usage cache enabled");
    if config.binds_all_interfaces() {
        info!(
            port = config.port,
            "Bound to all interfaces; the API is reachable from other machines on the network"
        );
    }
    info!("Press Ctrl+C to stop");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
