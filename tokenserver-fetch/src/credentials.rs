//! Claude OAuth bearer token readers.
//!
//! Claude Code stores its OAuth credentials in two places:
//!
//! 1. **Keychain**: service="Claude Code-credentials", account=login user
//! 2. **File**: `~/.claude/.credentials.json` (Linux, or when no keychain)
//!
//! # Credentials Format
//!
//! ```json
//! {
//!   "claudeAiOauth": {
//!     "accessToken": "...",
//!     "refreshToken": "...",
//!     "expiresAt": 1735000000000,
//!     "scopes": ["user:profile", "..."]
//!   }
//! }
//! ```
//!
//! Only `claudeAiOauth.accessToken` is used. The token is re-read on every
//! call and never logged.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokenserver_core::{CredentialError, CredentialReader, Token};
use tracing::{debug, instrument, warn};

use crate::error::KeychainError;
use crate::host::keychain::KeychainApi;

// ============================================================================
// Constants
// ============================================================================

/// Keychain service name used by Claude Code.
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Claude Code-credentials";

/// Top-level key of the OAuth section.
const OAUTH_KEY: &str = "claudeAiOauth";

/// Key of the access token inside the OAuth section.
const ACCESS_TOKEN_KEY: &str = "accessToken";

// ============================================================================
// Parsing
// ============================================================================

/// Extracts `claudeAiOauth.accessToken` from a credentials document.
///
/// # Errors
///
/// - [`CredentialError::Malformed`] if the document is not JSON, the field is
///   missing, or it is not a string
/// - [`CredentialError::EmptyToken`] if the field is empty or null
pub fn parse_credentials(raw: &str) -> Result<Token, CredentialError> {
    let document: Value = serde_json::from_str(raw.trim())
        .map_err(|e| CredentialError::Malformed(format!("invalid JSON: {e}")))?;

    let field = document
        .get(OAUTH_KEY)
        .and_then(|oauth| oauth.get(ACCESS_TOKEN_KEY))
        .ok_or_else(|| {
            CredentialError::Malformed(format!("missing field `{OAUTH_KEY}.{ACCESS_TOKEN_KEY}`"))
        })?;

    match field {
        Value::Null => Err(CredentialError::EmptyToken),
        Value::String(s) => {
            let token = Token::new(s.as_str());
            if token.is_empty() {
                Err(CredentialError::EmptyToken)
            } else {
                Ok(token)
            }
        }
        _ => Err(CredentialError::Malformed(format!(
            "`{OAUTH_KEY}.{ACCESS_TOKEN_KEY}` is not a string"
        ))),
    }
}

// ============================================================================
// Keychain Reader
// ============================================================================

/// Reads the token from the system keychain.
///
/// Claude Code writes the entry with the login user name as account; older
/// installs used an empty account. Both are tried, user name first.
pub struct KeychainCredentialReader {
    keychain: Arc<dyn KeychainApi>,
    service: String,
    accounts: Vec<String>,
}

impl KeychainCredentialReader {
    /// Creates a reader for `service` on a custom keychain.
    pub fn with_keychain(keychain: Arc<dyn KeychainApi>, service: impl Into<String>) -> Self {
        let username = whoami::username();
        let mut accounts = Vec::with_capacity(2);
        if !username.is_empty() {
            accounts.push(username);
        }
        accounts.push(String::new());

        Self {
            keychain,
            service: service.into(),
            accounts,
        }
    }

    /// Overrides the accounts tried, in order.
    pub fn with_accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Service name this reader looks up.
    pub fn service(&self) -> &str {
        &self.service
    }
}

#[async_trait]
impl CredentialReader for KeychainCredentialReader {
    #[instrument(skip(self), fields(service = %self.service))]
    async fn read_token(&self) -> Result<Token, CredentialError> {
        let mut saw_missing = false;
        let mut last_error: Option<KeychainError> = None;

        for account in &self.accounts {
            match self.keychain.get(&self.service, account).await {
                Ok(Some(secret)) => {
                    debug!(account = %account, "Found keychain entry");
                    return parse_credentials(&secret);
                }
                Ok(None) => saw_missing = true,
                Err(e) => {
                    warn!(account = %account, error = %e, "Keychain lookup failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !saw_missing => Err(CredentialError::Unavailable(e.to_string())),
            _ => Err(CredentialError::NotFound {
                service: self.service.clone(),
            }),
        }
    }
}

// ============================================================================
// File Reader
// ============================================================================

/// Reads the token from a credentials JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialReader {
    path: PathBuf,
}

impl FileCredentialReader {
    /// Creates a reader for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file this reader uses.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path Claude Code writes its credentials file to.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".claude").join(".credentials.json"))
    }
}

#[async_trait]
impl CredentialReader for FileCredentialReader {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read_token(&self) -> Result<Token, CredentialError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CredentialError::NotFound {
                    service: self.path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(CredentialError::Unavailable(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        debug!("Read credentials file");
        parse_credentials(&content)
    }
}

// ============================================================================
// Tests
// ============================================================================
