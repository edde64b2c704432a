//! Gateway configuration types.
//!
//! This module defines configuration structures for the HTTP/WebSocket gateway.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Allowed CORS origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Connection record TTL in seconds.
    ///
    /// Records of connections that vanish without a clean disconnect are
    /// reaped once this long past their creation.
    #[serde(default = "GatewayConfig::default_connection_ttl")]
    pub connection_ttl_seconds: i64,

    /// Interval between expired-record sweeps, in seconds.
    #[serde(default = "GatewayConfig::default_sweep_interval")]
    pub sweep_interval_seconds: u64,

    /// Fallback queue selector for contacts that cannot be agent-routed.
    #[serde(default = "GatewayConfig::default_queue")]
    pub default_queue: String,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    const fn default_connection_ttl() -> i64 {
        7200 // 2 hours
    }

    const fn default_sweep_interval() -> u64 {
        300
    }

    fn default_queue() -> String {
        "default".to_string()
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Get the connection TTL as a `chrono::Duration`.
    #[must_use]
    pub fn connection_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.connection_ttl_seconds)
    }

    /// Get the sweep interval as a `Duration`.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            cors_origins: vec!["*".to_string()],
            connection_ttl_seconds: Self::default_connection_ttl(),
            sweep_interval_seconds: Self::default_sweep_interval(),
            default_queue: Self::default_queue(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}
