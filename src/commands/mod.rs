//! CLI command definitions and dispatch.

pub mod gateway;
pub mod hash_password;
pub mod migrate;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::oneshot;
use tokio::task::JoinError;

use nicelab_core::config::AppConfig;
use nicelab_core::error::{AppError, ErrorKind};

/// NiceLab lab-session services
#[derive(Debug, Parser)]
#[command(name = "nicelab", version, about, long_about = None)]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the auth and/or pipeline API
    Serve(serve::ServeArgs),
    /// Serve the edge gateway
    Gateway(gateway::GatewayArgs),
    /// Apply database migrations and exit
    Migrate,
    /// Print an Argon2 hash for seeding a user
    HashPassword(hash_password::HashPasswordArgs),
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Gateway(args) => gateway::execute(args, config).await,
            Commands::Migrate => migrate::execute(config).await,
            Commands::HashPassword(args) => hash_password::execute(args),
        }
    }
}

/// Resolves once Ctrl-C or SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Bind `addr` and serve `app` until a shutdown signal arrives.
///
/// In-flight requests get `grace` to finish; connections still open after
/// that are dropped.
pub async fn serve_until_shutdown(
    addr: &str,
    app: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    tracing::info!(address = %addr, "Listening");

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                tracing::info!("Shutdown signal received, draining connections");
                let _ = signalled_tx.send(());
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return server_result(joined),
        _ = signalled_rx => {}
    }

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => server_result(joined),
        Err(_) => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping connections");
            server.abort();
            Ok(())
        }
    }
}

fn server_result(joined: Result<std::io::Result<()>, JoinError>) -> Result<(), AppError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::with_source(ErrorKind::Internal, "Server error", e)),
        Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
    }
}
