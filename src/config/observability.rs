//! Observability settings from the config file.

use serde::Deserialize;
use std::path::PathBuf;

/// Observability section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilitySettings {
    /// Logging settings.
    #[serde(default)]
    pub logging: Option<LoggingSettings>,
    /// Metrics settings.
    #[serde(default)]
    pub metrics: Option<MetricsSettings>,
}

/// Logging section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Default level directive, e.g. `info` or `kvgate=debug`.
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Metrics section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Whether to install the Prometheus exporter.
    pub enabled: Option<bool>,
    /// Port for the exporter's scrape endpoint.
    pub port: Option<u16>,
}
