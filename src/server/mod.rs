//! HTTP surface.
//!
//! Every resource path is mounted; a path whose backend slot is empty answers
//! with its route's JSON error envelope (`<backend>: not configured`).
//!
//! | Path | Backend slot |
//! |------|--------------|
//! | `/inmemory` | [`BackendSet::local`] |
//! | `/redis` | [`BackendSet::remote`] |
//! | `/mongodb/records` | [`BackendSet::records`] |
//!
//! Any other path answers 404.

mod errors;
mod kv;
mod records;

pub use errors::{ErrorBody, RecordsEnvelope, RequestError};
pub use kv::kv_router;
pub use records::{RECORDS_ROUTE, records_router};

use crate::config::ApplicationSettings;
use crate::observability::propagate_request_id;
use crate::services::BackendSet;
use crate::storage::{AggregationClient, KeyValueStore, Unconfigured};
use crate::{Error, Result};
use axum::Router;
use axum::http::header::{self, CONTENT_TYPE, HeaderMap, HeaderValue};
use axum::middleware;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinError;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Path of the local key-value route.
pub const INMEMORY_ROUTE: &str = "/inmemory";

/// Path of the remote key-value route.
pub const REDIS_ROUTE: &str = "/redis";

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub addr: String,
    /// How long in-flight requests may run after shutdown starts.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Builds server settings from the `application` config section.
    #[must_use]
    pub fn from_settings(settings: &ApplicationSettings) -> Self {
        Self {
            addr: settings.listen_addr(),
            shutdown_timeout: settings.shutdown_timeout(),
        }
    }
}

/// Builds the application router over `backends`.
///
/// Empty slots are served by an [`Unconfigured`] stand-in.
pub fn build_router(backends: &BackendSet) -> Router {
    let local = backends
        .local
        .clone()
        .unwrap_or_else(|| missing_store("inmemory"));
    let remote = backends
        .remote
        .clone()
        .unwrap_or_else(|| missing_store("redis"));
    let records = backends.records.clone().unwrap_or_else(|| {
        let client: Arc<dyn AggregationClient> = Arc::new(Unconfigured::new("mongodb"));
        client
    });

    let router = Router::new()
        .merge(kv_router(INMEMORY_ROUTE, local))
        .merge(kv_router(REDIS_ROUTE, remote))
        .merge(records_router(records));

    with_common_layers(router)
}

fn missing_store(backend: &'static str) -> Arc<dyn KeyValueStore> {
    Arc::new(Unconfigured::new(backend))
}

/// Wraps `router` with tracing, request ids, and response headers.
pub fn with_common_layers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(middleware::from_fn(propagate_request_id))
        .layer(TraceLayer::new_for_http())
}

/// Checks that a request body is declared as JSON.
///
/// Only the media type is compared; parameters such as `charset` are ignored.
pub(crate) fn require_json(headers: &HeaderMap) -> std::result::Result<(), RequestError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"));

    if is_json {
        Ok(())
    } else {
        Err(RequestError::InvalidContentType)
    }
}

/// Binds the listener and serves until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, router: Router) -> Result<()> {
    let listener = TcpListener::bind(&config.addr)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{}: {e}", config.addr),
        })?;

    run_until(listener, router, shutdown_signal(), config.shutdown_timeout).await
}

/// Serves `router` on `listener` until `shutdown` completes.
///
/// After `shutdown` fires the listener stops accepting and in-flight
/// requests get `timeout` to finish. A shutdown that overruns is logged and
/// the remaining connections are dropped; it is not an error.
///
/// # Errors
///
/// Returns an error if the server fails before or while draining.
pub async fn run_until<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    timeout: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Server listening");
    }

    let drain = Arc::new(Notify::new());
    let drain_signal = Arc::clone(&drain);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { drain_signal.notified().await })
            .await
    });

    tokio::select! {
        result = &mut server => return server_outcome(result),
        () = shutdown => {},
    }

    tracing::info!(timeout_secs = timeout.as_secs(), "Shutting down server");
    drain.notify_one();

    if let Ok(result) = tokio::time::timeout(timeout, &mut server).await {
        server_outcome(result)?;
    } else {
        tracing::warn!("connections can't finish their job for given time");
        server.abort();
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn server_outcome(result: std::result::Result<io::Result<()>, JoinError>) -> Result<()> {
    result
        .map_err(|e| e.to_string())
        .and_then(|served| served.map_err(|e| e.to_string()))
        .map_err(|cause| Error::OperationFailed {
            operation: "serve".to_string(),
            cause,
        })
}

/// Resolves on the first SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Received SIGINT"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}
