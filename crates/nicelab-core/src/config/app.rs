//! Listener and CORS settings for the HTTP processes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how an HTTP process listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request budget. Keep it above the provisioning deadline so a
    /// slow lab surfaces as a provisioning timeout, not a gateway one.
    pub request_timeout_seconds: u64,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_seconds: u64,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 60,
            shutdown_grace_seconds: 30,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

/// Cross-origin policy for browser clients.
///
/// An origin list containing `"*"` allows every origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// Preflight cache lifetime.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            allowed_origins: owned(&["*"]),
            allowed_methods: owned(&["GET", "POST", "OPTIONS"]),
            allowed_headers: owned(&["X-Session-Token", "Content-Type"]),
            max_age_seconds: 3600,
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
