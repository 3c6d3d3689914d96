//! Domain models for `TokenServer`.
//!
//! ## Submodules
//!
//! - [`token`] - Bearer credential
//! - [`usage`] - Usage payload, cached snapshot, and response envelope

mod token;
mod usage;

pub use token::Token;
pub use usage::{UsagePayload, UsageResult, UsageSnapshot};
