// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TokenServer` Fetch
//!
//! Everything that talks to the outside world on behalf of the usage service.
//!
//! ## Host APIs
//!
//! The [`host`] module wraps system interactions:
//!
//! - [`host::keychain`] - Secure credential storage (system keychain)
//! - [`host::http`] - HTTP client with a bounded timeout and tracing
//!
//! ## Components
//!
//! - [`credentials`] - Bearer token readers (keychain, credentials file)
//! - [`usage`] - Anthropic OAuth usage endpoint client
//!
//! ## Example
//!
//! ```ignore
//! use tokenserver_core::{CredentialReader, UsageFetcher};
//! use std::sync::Arc;
//! use tokenserver_fetch::{
//!     AnthropicUsageFetcher, KeychainCredentialReader, SystemKeychain, DEFAULT_KEYCHAIN_SERVICE,
//! };
//!
//! let reader = KeychainCredentialReader::with_keychain(
//!     Arc::new(SystemKeychain::new()),
//!     DEFAULT_KEYCHAIN_SERVICE,
//! );
//! let fetcher = AnthropicUsageFetcher::new()?;
//!
//! let token = reader.read_token().await?;
//! let usage = fetcher.fetch_usage(&token).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod host;
pub mod usage;

// Errors
pub use error::{HttpError, KeychainError};

// Host APIs
pub use host::{
    http::HttpClient,
    keychain::{KeychainApi, SystemKeychain},
};

// Components
pub use credentials::{
    FileCredentialReader, KeychainCredentialReader, DEFAULT_KEYCHAIN_SERVICE, parse_credentials,
};
pub use usage::{AnthropicUsageFetcher, ANTHROPIC_BETA, DEFAULT_TIMEOUT, USAGE_URL};
