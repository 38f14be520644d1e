//! Configuration management.
//!
//! Settings come from a single JSON file named on the command line:
//!
//! ```json
//! {
//!   "application": { "host": "0.0.0.0", "port": 8080 },
//!   "databases": [
//!     { "name": "local", "type": "inmemory", "connection_string": "" },
//!     { "name": "cache", "type": "redis", "connection_string": "redis://localhost:6379/0" },
//!     { "name": "getir", "type": "mongodb", "connection_string": "mongodb://localhost:27017" }
//!   ]
//! }
//! ```

mod observability;

pub use observability::{LoggingSettings, MetricsSettings, ObservabilitySettings};

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default graceful shutdown window.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Main configuration for kvgate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener settings.
    #[serde(default)]
    pub application: ApplicationSettings,
    /// Backend connection descriptors, in declaration order.
    #[serde(default)]
    pub databases: Vec<BackendDescriptor>,
    /// Logging and metrics settings.
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationSettings {
    /// Host or IP to bind.
    #[serde(default)]
    pub host: String,
    /// TCP port to bind.
    #[serde(default)]
    pub port: u16,
    /// Graceful shutdown window in seconds.
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,
}

impl ApplicationSettings {
    /// Returns the `host:port` string to bind.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the graceful shutdown window.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.shutdown_timeout_secs
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        )
    }
}

/// One backend entry from the `databases` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendDescriptor {
    /// Logical name; the database name for document stores.
    #[serde(default)]
    pub name: String,
    /// Declared backend type, e.g. `"redis"`.
    #[serde(rename = "type", default)]
    pub backend_type: String,
    /// Backend-specific connection string.
    #[serde(default)]
    pub connection_string: String,
}

impl BackendDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        backend_type: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend_type: backend_type.into(),
            connection_string: connection_string.into(),
        }
    }

    /// Returns the backend kind, or `None` for an unrecognized type.
    #[must_use]
    pub fn kind(&self) -> Option<BackendKind> {
        BackendKind::parse(&self.backend_type)
    }
}

/// Recognized backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Process-local key-value map.
    InMemory,
    /// Redis-backed key-value store.
    Redis,
    /// MongoDB aggregation source.
    MongoDb,
}

impl BackendKind {
    /// Parses a declared type string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inmemory" => Some(Self::InMemory),
            "redis" => Some(Self::Redis),
            "mongodb" => Some(Self::MongoDb),
            _ => None,
        }
    }

    /// Returns the canonical type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "inmemory",
            Self::Redis => "redis",
            Self::MongoDb => "mongodb",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppConfig {
    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `path` is empty, or
    /// [`Error::OperationFailed`] if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidInput("config file value not given".to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_json(&contents)
    }

    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the text is not valid configuration.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })
    }
}
