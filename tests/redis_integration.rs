//! Redis integration tests.
//!
//! Exercises [`RedisStore`] against a live server:
//! - connection and `PING` liveness check
//! - `set`/`get` round trips and overwrites
//! - missing keys surfacing as `redis: nil`
//! - the `/redis` route end to end
//!
//! These tests require a running Redis server. Set the environment variable
//! `KVGATE_TEST_REDIS_URL` to enable them:
//!
//! ```bash
//! export KVGATE_TEST_REDIS_URL="redis://localhost:6379/0"
//! cargo test --features redis redis_integration
//! ```

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::print_stderr)]
#![cfg(feature = "redis")]

use kvgate::storage::RedisStore;
use kvgate::{Error, KeyValuePair, KeyValueStore};
use std::env;
use uuid::Uuid;

/// Environment variable for Redis test connection URL.
const REDIS_URL_ENV: &str = "KVGATE_TEST_REDIS_URL";

/// Returns the Redis connection URL if available, or None to skip tests.
fn get_redis_url() -> Option<String> {
    env::var(REDIS_URL_ENV).ok()
}

/// Macro to skip tests when Redis is not available.
macro_rules! require_redis {
    () => {
        match get_redis_url() {
            Some(url) => url,
            None => {
                eprintln!(
                    "Skipping test: {} not set. Set this environment variable to run Redis tests.",
                    REDIS_URL_ENV
                );
                return;
            },
        }
    };
}

fn unique_key(prefix: &str) -> String {
    format!("kvgate_test_{prefix}_{}", Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_connect_and_ping() {
    let url = require_redis!();

    let store = RedisStore::connect(&url).await.unwrap();
    store.ping().await.unwrap();
    assert_eq!(store.name(), "redis");
}

#[tokio::test]
async fn test_set_then_get() {
    let url = require_redis!();
    let store = RedisStore::connect(&url).await.unwrap();
    let pair = KeyValuePair::new(unique_key("roundtrip"), "value");

    store.set(&pair).await.unwrap();
    assert_eq!(store.get(&pair.key).await.unwrap(), pair);
}

#[tokio::test]
async fn test_last_write_wins() {
    let url = require_redis!();
    let store = RedisStore::connect(&url).await.unwrap();
    let key = unique_key("overwrite");

    store.set(&KeyValuePair::new(&key, "first")).await.unwrap();
    store.set(&KeyValuePair::new(&key, "second")).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap().value, "second");
}

#[tokio::test]
async fn test_missing_key_is_nil() {
    let url = require_redis!();
    let store = RedisStore::connect(&url).await.unwrap();

    let err = store.get(&unique_key("missing")).await.unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { backend: "redis" }));
    assert_eq!(err.to_string(), "redis: nil");
}

#[tokio::test]
async fn test_clones_share_the_connection() {
    let url = require_redis!();
    let store = RedisStore::connect(&url).await.unwrap();
    let other = store.clone();
    let pair = KeyValuePair::new(unique_key("shared"), "value");

    store.set(&pair).await.unwrap();
    assert_eq!(other.get(&pair.key).await.unwrap(), pair);
}

#[tokio::test]
async fn test_unreachable_server_fails_to_connect() {
    let _url = require_redis!();

    let result = RedisStore::connect("redis://127.0.0.1:1/0").await;
    assert!(result.is_err());
}

mod routes {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use kvgate::server::build_router;
    use kvgate::services::BackendSet;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_post_then_get_over_http() {
        let url = require_redis!();
        let mut backends = BackendSet::default();
        backends.init_remote(&url).await.unwrap();
        let app = build_router(&backends);
        let key = unique_key("http");

        let post = Request::builder()
            .method("POST")
            .uri("/redis")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(r#"{{"key":"{key}","value":"v"}}"#)))
            .unwrap();
        let response = app.clone().oneshot(post).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let get = Request::builder()
            .uri(format!("/redis?key={key}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let pair: KeyValuePair = serde_json::from_slice(&body).unwrap();
        assert_eq!(pair, KeyValuePair::new(key, "v"));
    }
}
