//! Shared application state passed to all route handlers.

use std::sync::Arc;

use tokenserver_store::UsageService;

/// Name reported by `/health`.
pub const SERVER_NAME: &str = "ClaudeTokenServer";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The usage service; owns the cache.
    pub service: Arc<UsageService>,
    /// Name reported by `/health`.
    pub server_name: &'static str,
}

impl AppState {
    /// Creates state around a service.
    pub fn new(service: Arc<UsageService>) -> Self {
        Self {
            service,
            server_name: SERVER_NAME,
        }
    }
}
