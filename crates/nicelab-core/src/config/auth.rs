//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session-token authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Request header carrying the opaque session token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Lifetime of an issued token in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_header: default_token_header(),
            token_ttl_hours: default_token_ttl(),
        }
    }
}

fn default_token_header() -> String {
    "X-Session-Token".to_string()
}

fn default_token_ttl() -> u64 {
    24
}
