//! Upstream status mapping tests against a local mock server.

use std::time::Duration;

use serde_json::json;
use tokenserver_core::{FetchError, FetchErrorKind, Token, UsageFetcher};
use tokenserver_fetch::{AnthropicUsageFetcher, ANTHROPIC_BETA};

const PATH: &str = "/api/oauth/usage";

fn fetcher_for(server: &mockito::ServerGuard) -> AnthropicUsageFetcher {
    AnthropicUsageFetcher::with_endpoint(format!("{}{PATH}", server.url()), Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn test_success_returns_body_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "five_hour": {"utilization": 25.0, "resets_at": "2025-01-01T12:00:00Z"},
        "seven_day": {"utilization": 45.0, "resets_at": null},
        "extra": [1, 2, 3]
    });
    let mock = server
        .mock("GET", PATH)
        .match_header("authorization", "Bearer good-token")
        .match_header("anthropic-beta", ANTHROPIC_BETA)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let usage = fetcher_for(&server)
        .fetch_usage(&Token::new("good-token"))
        .await
        .unwrap();

    assert_eq!(usage, body);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_expired() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .with_status(401)
        .with_body(r#"{"error":"invalid token"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch_usage(&Token::new("expired"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::AuthExpired);
    assert!(err.to_string().contains("HTTP 401"));
    assert!(err.to_string().contains("log in to Claude Code again"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_forbidden_maps_to_auth_expired() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", PATH)
        .with_status(403)
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch_usage(&Token::new("t"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::AuthExpired { status: 403 }));
}

#[tokio::test]
async fn test_server_error_includes_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", PATH)
        .with_status(503)
        .with_body("upstream overloaded")
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch_usage(&Token::new("t"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::UpstreamError);
    let msg = err.to_string();
    assert!(msg.contains("503"));
    assert!(msg.contains("upstream overloaded"));
}

#[tokio::test]
async fn test_rate_limit_is_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PATH)
        .with_status(429)
        .with_body("slow down")
        .expect(1)
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch_usage(&Token::new("t"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Upstream { status: 429, .. }));
    // No retry on failure.
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", PATH)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = fetcher_for(&server)
        .fetch_usage(&Token::new("t"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedBody(_)));
    assert_eq!(err.kind(), FetchErrorKind::UpstreamError);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind then drop a listener to get a port with nothing behind it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = AnthropicUsageFetcher::with_endpoint(
        format!("http://{addr}{PATH}"),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = fetcher.fetch_usage(&Token::new("t")).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::NetworkError);
    assert!(err.to_string().starts_with("Network error: "));
}

#[tokio::test]
async fn test_silent_server_times_out_as_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and hold connections without ever answering.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let fetcher = AnthropicUsageFetcher::with_endpoint(
        format!("http://{addr}{PATH}"),
        Duration::from_secs(1),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = fetcher.fetch_usage(&Token::new("t")).await.unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::NetworkError);
    assert!(err.to_string().contains("timed out"), "{err}");
    assert!(started.elapsed() < Duration::from_secs(5));
    server.abort();
}

#[tokio::test]
async fn test_truncated_error_body_is_reported() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let fetcher = AnthropicUsageFetcher::with_endpoint(
        format!("http://{addr}{PATH}"),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = fetcher.fetch_usage(&Token::new("t")).await.unwrap_err();
    match err {
        FetchError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert!(body.starts_with("<body unavailable: "), "{body}");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    server.await.unwrap();
}
