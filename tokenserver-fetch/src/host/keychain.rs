//! Secure credential storage using the system keychain.
//!
//! This module provides read access to the system's secure credential storage:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Lookups are never cached. Claude Code rotates its OAuth token, so every
//! cache miss in the usage service must see the current entry.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::KeychainError;

// ============================================================================
// Keychain API Trait
// ============================================================================

/// Read-only API for secure credential storage.
#[async_trait]
pub trait KeychainApi: Send + Sync {
    /// Get a secret from the keychain.
    ///
    /// # Arguments
    /// * `service` - Service identifier (e.g., "Claude Code-credentials")
    /// * `account` - Account identifier (usually the login user name)
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - Entry found
    /// * `Ok(None)` - Entry not found
    /// * `Err(e)` - Error accessing keychain
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError>;
}

// ============================================================================
// System Keychain Implementation
// ============================================================================

/// Default implementation using the system keychain.
///
/// This uses the `keyring` crate which provides cross-platform access to:
/// - macOS Keychain Services
/// - Windows Credential Manager
/// - Linux Secret Service API
///
/// Platform calls block (on macOS they are IPC to `securityd`), so they run
/// on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    /// Creates a new system keychain instance.
    pub fn new() -> Self {
        Self
    }

    /// Blocking lookup of a single entry.
    fn get_blocking(service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        let entry =
            Entry::new(service, account).map_err(|e| KeychainError::Platform(e.to_string()))?;

        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeychainApi for SystemKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        debug!(service = %service, account = %account, "Getting credential from keychain");

        let owned_service = service.to_string();
        let owned_account = account.to_string();
        let result = tokio::task::spawn_blocking(move || {
            Self::get_blocking(&owned_service, &owned_account)
        })
        .await
        .map_err(|e| KeychainError::Unavailable(format!("keychain task failed: {e}")))?;

        match &result {
            Ok(Some(_)) => debug!(service = %service, account = %account, "Credential found"),
            Ok(None) => debug!(service = %service, account = %account, "Credential not found"),
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to get credential");
            }
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================
