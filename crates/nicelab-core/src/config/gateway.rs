//! Edge gateway configuration.

use serde::{Deserialize, Serialize};

/// Upstream addresses for the path-prefix reverse proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the auth service (`/v1/auth/*`).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL of the pipeline service (`/v1/pipeline/*`).
    #[serde(default = "default_pipeline_url")]
    pub pipeline_url: String,
    /// Upstream request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            pipeline_url: default_pipeline_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_auth_url() -> String {
    "http://auth:8080".to_string()
}

fn default_pipeline_url() -> String {
    "http://pipeline:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
