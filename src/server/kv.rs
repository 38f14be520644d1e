//! Key-value routes (`/inmemory`, `/redis`).
//!
//! `POST` stores a pair and answers with the pair read back from the store.
//! `GET ?key=` answers with the stored pair.

use super::errors::{ErrorBody, RequestError};
use super::require_json;
use crate::Error;
use crate::models::KeyValuePair;
use crate::observability::{current_request_id, record_backend_error, record_request};
use crate::storage::KeyValueStore;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use std::sync::Arc;

/// Shared state of one key-value route.
#[derive(Clone)]
struct KvState {
    store: Arc<dyn KeyValueStore>,
    route: &'static str,
}

/// Builds a router serving `route` from `store`.
///
/// Request bodies are not size limited.
pub fn kv_router(route: &'static str, store: Arc<dyn KeyValueStore>) -> Router {
    Router::new()
        .route(route, any(handle_kv))
        .layer(DefaultBodyLimit::disable())
        .with_state(KvState { store, route })
}

/// First `key` parameter of the query string, or empty.
fn first_key(params: Vec<(String, String)>) -> String {
    params
        .into_iter()
        .find_map(|(name, value)| (name == "key").then_some(value))
        .unwrap_or_default()
}

async fn handle_kv(
    State(state): State<KvState>,
    method: Method,
    headers: HeaderMap,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let key = params.map(|Query(params)| first_key(params)).unwrap_or_default();

    let response = match dispatch(state.store.as_ref(), &method, &headers, &key, &body).await {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(err) => {
            if let RequestError::Backend(cause) = &err {
                log_backend_error(state.store.name(), cause);
            }
            ErrorBody::response(&err)
        },
    };

    record_request(state.route, response.status().as_u16());
    response
}

/// Runs one key-value request against `store`.
///
/// `key` is the lookup query parameter and `body` the raw request body;
/// each is only consulted by the method that uses it.
///
/// # Errors
///
/// Returns the [`RequestError`] describing why the request was rejected.
pub async fn dispatch(
    store: &dyn KeyValueStore,
    method: &Method,
    headers: &HeaderMap,
    key: &str,
    body: &[u8],
) -> Result<KeyValuePair, RequestError> {
    if method == Method::POST {
        require_json(headers)?;
        create_or_update(store, body).await
    } else if method == Method::GET {
        lookup(store, key).await
    } else {
        Err(RequestError::MethodNotAllowed)
    }
}

async fn create_or_update(
    store: &dyn KeyValueStore,
    body: &[u8],
) -> Result<KeyValuePair, RequestError> {
    let pair = if body.is_empty() {
        KeyValuePair::default()
    } else {
        serde_json::from_slice::<KeyValuePair>(body).map_err(|_| RequestError::InvalidInput)?
    };
    if !pair.is_complete() {
        return Err(RequestError::InvalidInput);
    }

    store.set(&pair).await?;
    Ok(store.get(&pair.key).await?)
}

async fn lookup(store: &dyn KeyValueStore, key: &str) -> Result<KeyValuePair, RequestError> {
    if key.is_empty() {
        return Err(RequestError::KeyEmpty);
    }
    Ok(store.get(key).await?)
}

fn log_backend_error(backend: &'static str, cause: &Error) {
    let request_id = current_request_id();
    if matches!(cause, Error::KeyNotFound { .. }) {
        tracing::debug!(backend, request_id = request_id.as_deref(), "Key not found");
    } else {
        tracing::warn!(
            backend,
            request_id = request_id.as_deref(),
            error = %cause,
            "Key-value backend call failed"
        );
        record_backend_error(backend);
    }
}
