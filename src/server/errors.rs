//! Request-level errors and response envelopes.
//!
//! The key-value routes and the records route answer failures with different
//! bodies:
//!
//! | Route | Failure body |
//! |-------|--------------|
//! | `/inmemory`, `/redis` | `{"error": "<message>"}` |
//! | `/mongodb/records` | `{"code": 1, "msg": "<message>"}` |

use crate::models::AggregationRecord;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Why a request was rejected.
///
/// `Display` strings are the exact messages written to the wire.
#[derive(Debug, ThisError)]
pub enum RequestError {
    /// Method not accepted on this route.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Body was not declared as JSON.
    #[error("invalid content-type")]
    InvalidContentType,

    /// Body did not decode to a complete key-value pair.
    #[error("invalid json input")]
    InvalidInput,

    /// Lookup without a `key` query parameter.
    #[error("key can not be empty")]
    KeyEmpty,

    /// Filter body did not decode.
    #[error("json: marshal")]
    Marshal,

    /// The aggregation query failed.
    #[error("mongodb: fetch error")]
    FetchFailed,

    /// A key-value backend call failed; its message is passed through.
    #[error(transparent)]
    Backend(#[from] crate::Error),
}

impl RequestError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InvalidInput | Self::KeyEmpty | Self::Backend(_) => StatusCode::BAD_REQUEST,
            Self::Marshal | Self::FetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure body of the key-value routes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error message.
    pub error: String,
}

impl ErrorBody {
    /// Renders a request error as a key-value failure response.
    #[must_use]
    pub fn response(err: &RequestError) -> Response {
        let body = Self {
            error: err.to_string(),
        };
        (err.status(), Json(body)).into_response()
    }
}

/// Envelope of the records route, for both outcomes.
#[derive(Debug, Serialize)]
pub struct RecordsEnvelope {
    /// `0` on success, `1` on failure.
    pub code: u8,
    /// `"success"` or the failure message.
    pub msg: String,
    /// Present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<AggregationRecord>>,
}

impl RecordsEnvelope {
    /// Success envelope carrying `records`.
    #[must_use]
    pub fn success(records: Vec<AggregationRecord>) -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            records: Some(records),
        }
    }

    /// Failure envelope for `err`.
    #[must_use]
    pub fn failure(err: &RequestError) -> Self {
        Self {
            code: 1,
            msg: err.to_string(),
            records: None,
        }
    }

    /// Renders a request error as a records failure response.
    #[must_use]
    pub fn failure_response(err: &RequestError) -> Response {
        (err.status(), Json(Self::failure(err))).into_response()
    }
}
