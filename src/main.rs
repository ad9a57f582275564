//! NiceLab entry point.
//!
//! Parses the command line, loads configuration, initializes logging, and
//! dispatches to the selected subcommand.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use nicelab_core::config::AppConfig;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

/// Initialize tracing with the configured level and format.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
