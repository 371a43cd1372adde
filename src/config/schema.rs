//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the validator.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the validator service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Reference data location and file names.
    pub data: DataConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

impl ValidatorConfig {
    /// Apply the `PORT` environment variable to the bind address, if set.
    pub fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            self.listener.set_port(&port);
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Replace the port part of the bind address, keeping the host.
    pub fn set_port(&mut self, port: &str) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.bind_address = format!("{host}:{port}");
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Reference data configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the CSV files.
    pub dir: PathBuf,

    /// Reload tables when files in `dir` change.
    pub watch: bool,

    /// Quiet period in milliseconds before a watched change is reloaded.
    pub settle_ms: u64,

    /// File names inside `dir`.
    pub files: DataFiles,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            watch: false,
            settle_ms: 500,
            files: DataFiles::default(),
        }
    }
}

/// File name of each reference table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataFiles {
    pub requests: String,
    pub credits: String,
    pub suppliers: String,
    pub quality_officers: String,
    pub blacklist: String,
}

impl DataFiles {
    /// (table, file name) pairs in load order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("requests", self.requests.as_str()),
            ("credits", self.credits.as_str()),
            ("suppliers", self.suppliers.as_str()),
            ("quality_officers", self.quality_officers.as_str()),
            ("blacklist", self.blacklist.as_str()),
        ]
    }
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            requests: "data_requests.csv".to_string(),
            credits: "credits.csv".to_string(),
            suppliers: "suppliers.csv".to_string(),
            quality_officers: "quality_officers.csv".to_string(),
            blacklist: "supplier_blacklist.csv".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}
