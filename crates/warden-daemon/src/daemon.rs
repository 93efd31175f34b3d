//! Daemon setup and lifecycle management

use crate::config::{RuntimeBackend, WardenConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::scheduler::{Reconciler, Scheduler};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use warden_inventory::{GraphQlInventoryClient, InventoryClient};
use warden_runtime::{DockerApiObserver, DockerCliObserver, RuntimeObserver};

/// Warden daemon
pub struct Daemon {
    config: WardenConfig,
    runtime: Arc<dyn RuntimeObserver>,
    scheduler: Arc<Scheduler>,
    reconcile_rx: mpsc::Receiver<()>,
}

impl Daemon {
    /// Build the inventory client and runtime observer described by `config`
    pub fn new(config: WardenConfig) -> DaemonResult<Self> {
        config.validate()?;

        let inventory = GraphQlInventoryClient::new(
            &config.inventory.host,
            config.inventory.port,
            config.inventory.request_timeout(),
        )?;

        let runtime: Arc<dyn RuntimeObserver> = match config.runtime.backend {
            RuntimeBackend::Cli => Arc::new(DockerCliObserver::new(
                &config.runtime.docker_bin,
                config.runtime.request_timeout(),
            )),
            RuntimeBackend::Api => {
                let endpoint = config.runtime.api_endpoint.as_deref().ok_or_else(|| {
                    DaemonError::Config("runtime backend `api` requires an endpoint".into())
                })?;
                Arc::new(DockerApiObserver::new(
                    endpoint,
                    config.runtime.request_timeout(),
                )?)
            }
        };

        Ok(Self::with_components(config, Arc::new(inventory), runtime))
    }

    /// Assemble a daemon around existing components
    pub fn with_components(
        config: WardenConfig,
        inventory: Arc<dyn InventoryClient>,
        runtime: Arc<dyn RuntimeObserver>,
    ) -> Self {
        let reconciler =
            Reconciler::new(inventory, runtime.clone()).with_dedupe(config.scheduler.dedupe);
        let (scheduler, reconcile_rx) =
            Scheduler::new(config.scheduler.update_interval(), reconciler);

        Self {
            config,
            runtime,
            scheduler,
            reconcile_rx,
        }
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Run until SIGINT or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        let shutdown = shutdown_signal()?;

        #[cfg(unix)]
        spawn_reconcile_on_hangup(self.scheduler.clone())?;

        self.run_until(shutdown).await
    }

    /// Run until `shutdown` resolves.
    ///
    /// Fails without running any cycle if the runtime is unreachable.
    pub async fn run_until<F>(self, shutdown: F) -> DaemonResult<()>
    where
        F: Future<Output = ()>,
    {
        self.runtime.ping().await.map_err(|e| {
            tracing::error!(backend = self.runtime.backend(), error = %e, "Container runtime unreachable at startup");
            DaemonError::Runtime(e)
        })?;

        tracing::info!(
            inventory = %format!("{}:{}", self.config.inventory.host, self.config.inventory.port),
            runtime = self.runtime.backend(),
            interval_secs = self.config.scheduler.update_interval_secs,
            dedupe = self.config.scheduler.dedupe,
            "Warden daemon starting"
        );

        let mut handle = tokio::spawn(self.scheduler.clone().start(self.reconcile_rx));

        tokio::select! {
            _ = shutdown => {}
            res = &mut handle => {
                return Err(DaemonError::Scheduler(match res {
                    Ok(()) => "scheduler exited unexpectedly".to_string(),
                    Err(e) => e.to_string(),
                }));
            }
        }

        tracing::info!("Warden daemon shutting down");

        self.scheduler.stop();
        handle
            .await
            .map_err(|e| DaemonError::Scheduler(e.to_string()))?;

        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM
fn shutdown_signal() -> DaemonResult<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        #[cfg(unix)]
        let terminate = async move {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
            },
            _ = terminate => {
                tracing::info!("Received terminate signal, initiating graceful shutdown");
            }
        }
    })
}

/// SIGHUP triggers an immediate reconcile
#[cfg(unix)]
fn spawn_reconcile_on_hangup(scheduler: Arc<Scheduler>) -> DaemonResult<()> {
    let mut hangup = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())?;

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("Received SIGHUP, triggering reconciliation");
            scheduler.trigger_reconcile();
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = WardenConfig::default();
        config.scheduler.update_interval_secs = -1.0;
        assert!(matches!(Daemon::new(config), Err(DaemonError::Config(_))));
    }

    #[tokio::test]
    async fn test_new_builds_api_backend() {
        let mut config = WardenConfig::default();
        config.runtime.backend = RuntimeBackend::Api;
        config.runtime.api_endpoint = Some("tcp://127.0.0.1:2375".to_string());

        let daemon = Daemon::new(config).unwrap();
        assert_eq!(daemon.runtime.backend(), "docker-api");
    }

    #[tokio::test]
    async fn test_new_builds_cli_backend_by_default() {
        let daemon = Daemon::new(WardenConfig::default()).unwrap();
        assert_eq!(daemon.runtime.backend(), "docker-cli");
        assert_eq!(daemon.scheduler().cycles(), 0);
    }
}
