// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TokenServer` Store
//!
//! State and policy for the `TokenServer` application.
//!
//! This crate provides:
//!
//! - **`UsageCache`**: single-slot cache with a monotonic TTL
//! - **`UsageService`**: decides between serving the cache and fetching
//! - **Clocks**: system clock plus a manual clock for tests
//! - **`ServerConfig`**: layered server configuration
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokenserver_store::UsageService;
//! use tokenserver_fetch::{
//!     AnthropicUsageFetcher, FileCredentialReader,
//! };
//!
//! let service = UsageService::new(
//!     Arc::new(FileCredentialReader::new("/home/me/.claude/.credentials.json")),
//!     Arc::new(AnthropicUsageFetcher::new()?),
//! );
//!
//! let first = service.get_usage(false).await?;  // fetches
//! let second = service.get_usage(false).await?; // served from cache
//! assert!(second.cached);
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;

pub use cache::{UsageCache, DEFAULT_TTL};
pub use clock::{ManualClock, SystemClock};
pub use config::ServerConfig;
pub use error::ConfigError;
pub use service::UsageService;
