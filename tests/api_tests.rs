//! Token-cache and API-client behavior against a local mock upstream
//!
//! A throwaway axum server on a loopback port stands in for both the
//! authorization endpoint and the resource API, with hit counters to observe
//! how many exchanges and requests actually happen.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use reddit_mcp::config::{Config, RetryConfig};
use reddit_mcp::reddit::RedditClient;
use reddit_mcp::Error;

async fn spawn_mock(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn test_config(addr: SocketAddr) -> Config {
    Config {
        client_id: "test-id".to_string(),
        client_secret: "test-secret".to_string(),
        token_url: format!("http://{addr}/api/v1/access_token"),
        api_base_url: format!("http://{addr}"),
        request_timeout_secs: 5,
        retry: RetryConfig {
            enabled: true,
            max_attempts: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            multiplier: 2.0,
        },
        ..Config::default()
    }
}

fn token_route(hits: Arc<AtomicUsize>, expires_in: u64) -> Router {
    Router::new().route(
        "/api/v1/access_token",
        post(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({"access_token": "TOK1", "expires_in": expires_in}))
            }
        }),
    )
}

#[tokio::test]
async fn token_is_reused_within_validity_window() {
    let token_hits = Arc::new(AtomicUsize::new(0));

    let app = token_route(Arc::clone(&token_hits), 3600).route(
        "/r/rust/about",
        get(|| async { Json(json!({"kind": "t5", "data": {"display_name": "rust"}})) }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    client.request("/r/rust/about", &[]).await.unwrap();
    client.request("/r/rust/about", &[]).await.unwrap();
    client.request("/r/rust/about", &[]).await.unwrap();

    assert_eq!(token_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_requests_share_one_token_exchange() {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&token_hits);

    // A slow exchange widens the window in which all callers observe an
    // empty cache at once.
    let app = Router::new()
        .route(
            "/api/v1/access_token",
            post(move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    Json(json!({"access_token": "TOK1", "expires_in": 3600}))
                }
            }),
        )
        .route(
            "/r/rust/about",
            get(|| async { Json(json!({"kind": "t5", "data": {"display_name": "rust"}})) }),
        );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let (a, b, c, d) = tokio::join!(
        client.request("/r/rust/about", &[]),
        client.request("/r/rust/about", &[]),
        client.request("/r/rust/about", &[]),
        client.request("/r/rust/about", &[]),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();
    d.unwrap();

    assert_eq!(token_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_triggers_new_exchange() {
    let token_hits = Arc::new(AtomicUsize::new(0));

    // expires_in of zero means every cached token is already expired.
    let app = token_route(Arc::clone(&token_hits), 0)
        .route("/r/rust/about", get(|| async { Json(json!({})) }));
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    client.request("/r/rust/about", &[]).await.unwrap();
    client.request("/r/rust/about", &[]).await.unwrap();

    assert_eq!(token_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_exchange_is_not_cached() {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&token_hits);

    let app = Router::new().route(
        "/api/v1/access_token",
        post(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
            }
        }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let err = client.request("/r/rust/about", &[]).await.unwrap_err();
    match err {
        Error::Auth { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "HTTP Error: 401");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The failure left nothing in the cache; the next call exchanges again.
    let _ = client.request("/r/rust/about", &[]).await.unwrap_err();
    assert_eq!(token_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn upstream_404_is_not_retried() {
    let api_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&api_hits);

    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600).route(
        "/r/doesnotexist/about",
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})))
            }
        }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let err = client.request("/r/doesnotexist/about", &[]).await.unwrap_err();
    match err {
        Error::Upstream { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "HTTP Error: 404");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(api_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn response_body_is_returned_as_parsed_json() {
    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600).route(
        "/api/info",
        get(|| async { Json(json!({"data": {"id": "abc"}})) }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let value = client
        .request("/api/info", &[("id", "t1_abc".to_string())])
        .await
        .unwrap();
    assert_eq!(value, json!({"data": {"id": "abc"}}));
}

#[tokio::test]
async fn resource_401_refreshes_token_and_retries_once() {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let api_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&api_hits);

    let app = token_route(Arc::clone(&token_hits), 3600).route(
        "/r/rust/about",
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                // First hit answers as if the token had been revoked.
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::UNAUTHORIZED, Json(json!({})))
                } else {
                    (StatusCode::OK, Json(json!({"ok": true})))
                }
            }
        }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let value = client.request("/r/rust/about", &[]).await.unwrap();
    assert_eq!(value, json!({"ok": true}));
    assert_eq!(api_hits.load(Ordering::SeqCst), 2);
    assert_eq!(token_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn transient_500s_are_retried_until_success() {
    let api_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&api_hits);

    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600).route(
        "/r/rust/hot",
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
                } else {
                    (StatusCode::OK, Json(json!({"data": {"children": []}})))
                }
            }
        }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let value = client.request("/r/rust/hot", &[]).await.unwrap();
    assert_eq!(value, json!({"data": {"children": []}}));
    assert_eq!(api_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_error() {
    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600).route(
        "/r/rust/hot",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))) }),
    );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let err = client.request("/r/rust/hot", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Upstream { status: 503, .. }));
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout() {
    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600).route(
        "/r/rust/about",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            Json(json!({}))
        }),
    );
    let addr = spawn_mock(app).await;

    let config = Config {
        request_timeout_secs: 1,
        retry: RetryConfig {
            enabled: false,
            ..RetryConfig::default()
        },
        ..test_config(addr)
    };
    let client = RedditClient::new(&config).unwrap();

    let err = client.request("/r/rust/about", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let app = token_route(Arc::new(AtomicUsize::new(0)), 3600)
        .route("/r/rust/about", get(|| async { "<html>not json</html>" }));
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let err = client.request("/r/rust/about", &[]).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)), "got {err:?}");
}

#[derive(Deserialize)]
struct GrantForm {
    grant_type: String,
}

#[tokio::test]
async fn token_exchange_sends_basic_auth_and_grant_type() {
    let app = Router::new()
        .route(
            "/api/v1/access_token",
            post(|headers: HeaderMap, Form(form): Form<GrantForm>| async move {
                assert_eq!(form.grant_type, "client_credentials");
                // base64("test-id:test-secret")
                assert_eq!(
                    headers["authorization"],
                    "Basic dGVzdC1pZDp0ZXN0LXNlY3JldA=="
                );
                assert!(
                    headers["user-agent"]
                        .to_str()
                        .unwrap()
                        .starts_with("reddit-mcp:v")
                );
                Json(json!({"access_token": "TOK1", "expires_in": 3600}))
            }),
        )
        .route(
            "/r/rust/about",
            get(|headers: HeaderMap| async move {
                assert_eq!(headers["authorization"], "Bearer TOK1");
                Json(json!({}))
            }),
        );
    let addr = spawn_mock(app).await;
    let client = RedditClient::new(&test_config(addr)).unwrap();

    let value: Value = client.request("/r/rust/about", &[]).await.unwrap();
    assert_eq!(value, json!({}));
}
