//! Prometheus metrics.

use crate::config::MetricsSettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Counter of handled HTTP requests, labelled by route and status.
pub const HTTP_REQUESTS_TOTAL: &str = "kvgate_http_requests_total";

/// Counter of failed backend calls, labelled by backend.
pub const BACKEND_ERRORS_TOTAL: &str = "kvgate_backend_errors_total";

/// Default scrape port.
const DEFAULT_METRICS_PORT: u16 = 9090;

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Address to bind the metrics exporter.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from config settings.
    #[must_use]
    pub fn from_settings(settings: Option<&MetricsSettings>) -> Self {
        let enabled = settings.and_then(|config| config.enabled).unwrap_or(false);
        let port = settings
            .and_then(|config| config.port)
            .unwrap_or(DEFAULT_METRICS_PORT);

        Self {
            enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        }
    }
}

/// Installs the Prometheus recorder and its scrape listener.
///
/// Returns `None` when metrics are disabled; counters are then no-ops.
pub fn install_prometheus(config: &MetricsConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let (recorder, exporter) = PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_exporter_build".to_string(),
            cause: e.to_string(),
        })?;
    let handle = recorder.handle();

    metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })?;
    tokio::spawn(exporter);

    tracing::info!(addr = %config.listen_addr, "Prometheus exporter listening");
    Ok(Some(handle))
}

/// Counts one handled request.
pub fn record_request(route: &'static str, status: u16) {
    metrics::counter!(HTTP_REQUESTS_TOTAL, "route" => route, "status" => status.to_string())
        .increment(1);
}

/// Counts one failed backend call.
pub fn record_backend_error(backend: &'static str) {
    metrics::counter!(BACKEND_ERRORS_TOTAL, "backend" => backend).increment(1);
}
