//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file and `NICELAB__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod aws;
pub mod database;
pub mod gateway;
pub mod logging;
pub mod provisioning;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::aws::AwsConfig;
pub use self::database::DatabaseConfig;
pub use self::gateway::GatewayConfig;
pub use self::logging::LoggingConfig;
pub use self::provisioning::{ExecutorBackend, ProvisioningConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session-token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Remote provisioning settings.
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    /// AWS client settings.
    #[serde(default)]
    pub aws: AwsConfig,
    /// Edge gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default.toml` (if present), the explicit file at
    /// `path` (if given), and environment variables prefixed with
    /// `NICELAB__`, later sources overriding earlier ones.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("NICELAB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
