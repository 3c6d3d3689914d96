// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `TokenServer` HTTP
//!
//! Local HTTP API over the usage service.
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/usage` | cached usage (TTL-bounded) |
//! | GET | `/usage/fresh` | forced upstream fetch |
//! | GET | `/health` | liveness probe |
//!
//! Every response is JSON with a permissive CORS header. Trailing slashes are
//! ignored.

pub mod error;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use routes::{build_app, create_router, AVAILABLE_ENDPOINTS};
pub use server::{bind, serve};
pub use state::{AppState, SERVER_NAME};
