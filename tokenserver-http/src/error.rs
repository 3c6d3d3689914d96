//! Server lifecycle errors.

use std::io;

use thiserror::Error;

/// Errors that stop the server. Per-request failures never end up here.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The port is taken, usually by another instance.
    #[error(
        "Failed to bind to {addr}: address already in use. \
         Another TokenServer (or another program) is probably listening on this port; \
         stop it or choose a different port with --port."
    )]
    AddrInUse {
        /// Requested address.
        addr: String,
    },

    /// Binding needs privileges we don't have.
    #[error(
        "Failed to bind to {addr}: permission denied. \
         Ports below 1024 usually require elevated privileges; use a higher port."
    )]
    PermissionDenied {
        /// Requested address.
        addr: String,
    },

    /// Any other bind failure.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: String,
        /// Underlying error.
        source: io::Error,
    },

    /// The server loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}
