//! Configuration management.
//!
//! Layers, lowest first: built-in defaults, an optional JSON file, then
//! command-line flags (applied by the binary before [`ServerConfig::validate`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::ConfigError;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
    /// Upstream usage endpoint.
    pub upstream_url: String,
    /// Upstream request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Keychain service name holding the OAuth credentials.
    pub keychain_service: String,
    /// Read credentials from this JSON file instead of the keychain.
    pub credentials_file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_upstream_url() -> String {
    "https://api.anthropic.com/api/oauth/usage".to_string()
}

fn default_keychain_service() -> String {
    "Claude Code-credentials".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 8765,
            cache_ttl_secs: 300,
            upstream_url: default_upstream_url(),
            request_timeout_secs: 10,
            keychain_service: default_keychain_service(),
            credentials_file: None,
        }
    }
}

impl ServerConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tokenserver")
            .join("config.json")
    }

    /// Loads configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// path is used if present, otherwise built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing (explicit path only), can't be
    /// read, or isn't valid JSON.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!(path = %path.display(), "Config file not found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.keychain_service.is_empty() && self.credentials_file.is_none() {
            return Err(ConfigError::Invalid(
                "keychain_service must not be empty".to_string(),
            ));
        }

        let url = Url::parse(&self.upstream_url)
            .map_err(|e| ConfigError::Invalid(format!("upstream_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "upstream_url must be http or https, got {}",
                url.scheme()
            )));
        }

        Ok(())
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Returns true if bound to every interface.
    pub fn binds_all_interfaces(&self) -> bool {
        matches!(self.host.as_str(), "0.0.0.0" | "::" | "[::]")
    }

    /// Cache TTL.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Upstream request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================
