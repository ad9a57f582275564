//! Serve the HTTP API.

use std::sync::Arc;

use clap::Args;

use nicelab_api::{AppState, ServiceScope, build_router};
use nicelab_core::config::{AppConfig, ExecutorBackend};
use nicelab_core::error::AppError;
use nicelab_database::{DatabasePool, StoreSet};
use nicelab_provision::CommandExecutor;
use nicelab_provision::executor::NoopCommandExecutor;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Route groups to serve: all, auth, or pipeline
    #[arg(short, long, default_value = "all")]
    pub service: ServiceScope,

    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service = ?args.service,
        "Starting NiceLab"
    );

    let db = DatabasePool::connect(&config.database).await?;
    if config.database.auto_migrate {
        nicelab_database::migration::run_migrations(db.pool()).await?;
    }

    let executor = build_executor(&config).await;
    let stores = StoreSet::postgres(db.pool());
    let addr = config.server.bind_address();
    let grace = config.server.shutdown_grace();
    let state = AppState::build(config, stores, executor);

    state.gate.warm().await?;

    let app = build_router(state, args.service);
    let result = super::serve_until_shutdown(&addr, app, grace).await;

    db.close().await;
    tracing::info!("NiceLab stopped");
    result
}

async fn build_executor(config: &AppConfig) -> Arc<dyn CommandExecutor> {
    match config.provisioning.backend {
        ExecutorBackend::Ssm => {
            tracing::info!(region = %config.aws.region, "Using SSM command executor");
            Arc::new(nicelab_provision::executor::SsmCommandExecutor::from_config(&config.aws).await)
        }
        ExecutorBackend::Noop => {
            tracing::warn!("Using no-op command executor; lab machines are not provisioned");
            Arc::new(NoopCommandExecutor::new())
        }
    }
}
