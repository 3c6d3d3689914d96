//! Check command - is a usable credential present?

use anyhow::Result;
use tokenserver_core::CredentialError;
use tokenserver_store::ServerConfig;

use super::{credential_reader, load_config};
use crate::{Cli, ExitCode};

/// Runs the check command. Never prints the token.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let source = describe_source(&config);

    match credential_reader(&config).read_token().await {
        Ok(_) => {
            if !cli.quiet {
                println!("✓ Credential found ({source})");
            }
            Ok(())
        }
        Err(e) => {
            if !cli.quiet {
                println!("✗ {}", failure_line(&e, &source));
            }
            std::process::exit(ExitCode::CredentialMissing as i32);
        }
    }
}

fn describe_source(config: &ServerConfig) -> String {
    match &config.credentials_file {
        Some(path) => format!("file {}", path.display()),
        None => format!("keychain service '{}'", config.keychain_service),
    }
}

fn failure_line(error: &CredentialError, source: &str) -> String {
    format!("No usable credential in {source}: {error}")
}
