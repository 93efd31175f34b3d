//! Reconciliation loop

use super::reconciler::{CycleReport, Reconciler};
use crate::error::CycleError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::{interval, MissedTickBehavior};

/// Drives [`Reconciler`] cycles on a fixed interval until stopped
pub struct Scheduler {
    interval: Duration,
    reconciler: Mutex<Reconciler>,
    reconcile_tx: mpsc::Sender<()>,
    shutdown_tx: watch::Sender<bool>,
    cycles: AtomicU64,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(interval: Duration, reconciler: Reconciler) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (reconcile_tx, reconcile_rx) = mpsc::channel(1);
        let (shutdown_tx, _) = watch::channel(false);

        let scheduler = Arc::new(Self {
            interval,
            reconciler: Mutex::new(reconciler),
            reconcile_tx,
            shutdown_tx,
            cycles: AtomicU64::new(0),
        });

        (scheduler, reconcile_rx)
    }

    /// Request an extra cycle as soon as the current one (if any) finishes.
    ///
    /// Requests made while one is already pending are merged.
    pub fn trigger_reconcile(&self) {
        let _ = self.reconcile_tx.try_send(());
    }

    /// Stop the loop after the in-flight cycle, if any, completes
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Cycles started so far, including abandoned ones
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Run the loop. The first cycle starts immediately.
    pub async fn start(self: Arc<Self>, mut reconcile_rx: mpsc::Receiver<()>) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            "Scheduler started"
        );

        while !*shutdown_rx.borrow() {
            tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.run_logged("scheduled").await;
                }
                Some(()) = reconcile_rx.recv() => {
                    self.run_logged("triggered").await;
                }
            }
        }

        tracing::info!(cycles = self.cycles(), "Scheduler stopped");
    }

    /// Run a single cycle now
    pub async fn run_once(&self) -> Result<CycleReport, CycleError> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.reconciler.lock().await.run_cycle().await
    }

    async fn run_logged(&self, trigger: &'static str) {
        match self.run_once().await {
            Ok(report) => tracing::info!(
                trigger,
                expected = report.expected,
                running = report.running,
                started = report.started,
                stopped = report.stopped,
                skipped = report.skipped,
                failed = report.failed.len(),
                "Reconciliation cycle complete"
            ),
            Err(e) => tracing::error!(
                trigger,
                error = %e,
                "Reconciliation cycle abandoned, retrying next interval"
            ),
        }
    }
}
