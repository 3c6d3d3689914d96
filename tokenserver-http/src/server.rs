//! Listener binding and the serve loop.

use std::future::Future;
use std::io::ErrorKind;

use axum::extract::Request;
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tower_http::normalize_path::NormalizePath;
use tracing::{debug, info};

use crate::error::ServerError;

/// Binds a TCP listener on `addr` ("host:port").
///
/// # Errors
///
/// Returns a descriptive [`ServerError`] when the port is in use or needs
/// privileges.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            debug!(addr, "Listener bound");
            Ok(listener)
        }
        Err(e) => Err(match e.kind() {
            ErrorKind::AddrInUse => ServerError::AddrInUse {
                addr: addr.to_string(),
            },
            ErrorKind::PermissionDenied => ServerError::PermissionDenied {
                addr: addr.to_string(),
            },
            _ => ServerError::Bind {
                addr: addr.to_string(),
                source: e,
            },
        }),
    }
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the signal.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the accept loop fails.
pub async fn serve<F>(
    listener: TcpListener,
    app: NormalizePath<Router>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_in_use_is_descriptive() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().unwrap().to_string();

        let err = bind(&addr).await.unwrap_err();
        assert!(matches!(err, ServerError::AddrInUse { .. }));
        assert!(err.to_string().contains("address already in use"));
    }
}
