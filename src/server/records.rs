//! Aggregation route (`/mongodb/records`).

use super::errors::{RecordsEnvelope, RequestError};
use super::require_json;
use crate::models::{AggregationFilter, AggregationRecord};
use crate::observability::{current_request_id, record_backend_error, record_request};
use crate::storage::AggregationClient;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use std::sync::Arc;

/// Path of the aggregation route.
pub const RECORDS_ROUTE: &str = "/mongodb/records";

/// Builds a router serving [`RECORDS_ROUTE`] from `client`.
///
/// Request bodies are not size limited.
pub fn records_router(client: Arc<dyn AggregationClient>) -> Router {
    Router::new()
        .route(RECORDS_ROUTE, any(handle_records))
        .layer(DefaultBodyLimit::disable())
        .with_state(client)
}

async fn handle_records(
    State(client): State<Arc<dyn AggregationClient>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let response = match dispatch(client.as_ref(), &method, &headers, &body).await {
        Ok(records) => (StatusCode::OK, Json(RecordsEnvelope::success(records))).into_response(),
        Err(err) => RecordsEnvelope::failure_response(&err),
    };

    record_request(RECORDS_ROUTE, response.status().as_u16());
    response
}

/// Runs one aggregation request against `client`.
///
/// An empty body or a JSON `null` is an unfiltered query.
///
/// # Errors
///
/// Returns the [`RequestError`] describing why the request was rejected.
/// Query failures are logged and reported as [`RequestError::FetchFailed`].
pub async fn dispatch(
    client: &dyn AggregationClient,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<AggregationRecord>, RequestError> {
    if method != Method::POST {
        return Err(RequestError::MethodNotAllowed);
    }
    require_json(headers)?;

    let filter = if body.is_empty() {
        AggregationFilter::default()
    } else {
        serde_json::from_slice::<Option<AggregationFilter>>(body)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected aggregation filter");
                RequestError::Marshal
            })?
            .unwrap_or_default()
    };

    client.fetch(&filter).await.map_err(|e| {
        let request_id = current_request_id();
        tracing::warn!(
            request_id = request_id.as_deref(),
            error = %e,
            ?filter,
            "Aggregation query failed"
        );
        record_backend_error("mongodb");
        RequestError::FetchFailed
    })
}
