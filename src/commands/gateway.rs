//! Serve the edge gateway.

use clap::Args;

use nicelab_core::config::AppConfig;
use nicelab_core::error::AppError;

/// Arguments for the gateway command
#[derive(Debug, Args)]
pub struct GatewayArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the gateway command
pub async fn execute(args: &GatewayArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        auth = %config.gateway.auth_url,
        pipeline = %config.gateway.pipeline_url,
        "Starting gateway"
    );

    let grace = config.server.shutdown_grace();
    let app = nicelab_gateway::build_gateway_router(&config.gateway)?;
    super::serve_until_shutdown(&config.server.bind_address(), app, grace).await
}
