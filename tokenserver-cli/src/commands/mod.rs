//! CLI command implementations.

pub mod check;
pub mod serve;
pub mod usage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokenserver_core::CredentialReader;
use tokenserver_fetch::{
    AnthropicUsageFetcher, FileCredentialReader, KeychainCredentialReader, SystemKeychain,
};
use tokenserver_store::{ServerConfig, UsageService};
use tracing::debug;

use crate::Cli;

/// Loads the layered configuration (defaults, then file).
pub fn load_config(cli: &Cli) -> Result<ServerConfig> {
    ServerConfig::load(cli.config.as_deref()).context("Failed to load configuration")
}

/// Builds the credential reader the configuration selects.
pub fn credential_reader(config: &ServerConfig) -> Arc<dyn CredentialReader> {
    match &config.credentials_file {
        Some(path) => {
            debug!(path = %path.display(), "Reading credentials from file");
            Arc::new(FileCredentialReader::new(path.clone()))
        }
        None => {
            debug!(service = %config.keychain_service, "Reading credentials from keychain");
            Arc::new(KeychainCredentialReader::with_keychain(
                Arc::new(SystemKeychain::new()),
                config.keychain_service.clone(),
            ))
        }
    }
}

/// Builds the usage service from a validated configuration.
pub fn build_service(config: &ServerConfig) -> Result<UsageService> {
    let fetcher =
        AnthropicUsageFetcher::with_endpoint(config.upstream_url.clone(), config.request_timeout())
            .context("Failed to create HTTP client")?;

    Ok(UsageService::new(credential_reader(config), Arc::new(fetcher)).with_ttl(config.cache_ttl()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_service_uses_config_ttl() {
        let config = ServerConfig {
            cache_ttl_secs: 42,
            ..ServerConfig::default()
        };
        let service = build_service(&config).unwrap();
        assert_eq!(service.ttl(), std::time::Duration::from_secs(42));
        assert!(service.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_file_reader_selected_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"claudeAiOauth":{"accessToken":"abc"}}"#).unwrap();

        let config = ServerConfig {
            credentials_file: Some(path),
            ..ServerConfig::default()
        };
        let token = credential_reader(&config).read_token().await.unwrap();
        assert_eq!(token.expose(), "abc");
    }
}
