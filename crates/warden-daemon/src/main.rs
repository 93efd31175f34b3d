//! Warden Daemon - workload status reconciliation
//!
//! Periodically compares the workloads the inventory service expects with
//! the containers actually running, and records each workload's state back
//! to the inventory.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden_daemon::cli::Cli;
use warden_daemon::{Daemon, DaemonResult, WardenConfig};

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = WardenConfig::load(cli.config.as_deref())?;

    // Override with CLI args
    cli.apply(&mut config);

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wardend");

    let daemon = Daemon::new(config)?;
    daemon.run().await
}
