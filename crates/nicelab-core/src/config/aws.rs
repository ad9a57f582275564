//! AWS client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the AWS SDK clients.
///
/// When no static credentials are given the default provider chain
/// (environment, profile, instance metadata) is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    /// Override endpoint, e.g. a LocalStack URL.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}
