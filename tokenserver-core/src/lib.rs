// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TokenServer` Core
//!
//! Core types, errors, and traits shared by all `TokenServer` crates.
//!
//! ## Key Types
//!
//! ### Models
//! - [`Token`] - Bearer credential with redacted `Debug` output
//! - [`UsagePayload`] - Upstream usage document, passed through verbatim
//! - [`UsageSnapshot`] - The single cached payload with its fetch times
//! - [`UsageResult`] - Response envelope returned to HTTP clients
//!
//! ### Errors
//! - [`CredentialError`] - Secure-store lookup failures
//! - [`FetchError`] - Upstream call failures, see [`FetchErrorKind`]
//! - [`ServiceError`] - Tagged union of the two, see [`ErrorKind`]
//!
//! ### Traits
//! - [`CredentialReader`] - Reads the current bearer token
//! - [`UsageFetcher`] - Calls the upstream usage endpoint
//! - [`Clock`] - Monotonic and wall-clock time source

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{CredentialError, ErrorKind, FetchError, FetchErrorKind, ServiceError};

// Re-export model types
pub use models::{Token, UsagePayload, UsageResult, UsageSnapshot};

// Re-export traits
pub use traits::{Clock, CredentialReader, UsageFetcher};
