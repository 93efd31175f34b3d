//! One reconcile cycle

use super::dedupe::DedupeCache;
use super::diff::decide;
use crate::error::CycleError;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use warden_inventory::InventoryClient;
use warden_runtime::RuntimeObserver;
use warden_types::{ServerState, WorkloadId};

/// Outcome of a completed cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Workloads the inventory expects
    pub expected: usize,

    /// Containers the runtime reported running
    pub running: usize,

    /// Reports accepted with `started`
    pub started: usize,

    /// Reports accepted with `stopped`
    pub stopped: usize,

    /// Reports skipped because the state was unchanged (dedupe only)
    pub skipped: usize,

    /// Workloads whose report failed
    pub failed: Vec<WorkloadId>,
}

impl CycleReport {
    /// Reports the inventory accepted
    pub fn reported(&self) -> usize {
        self.started + self.stopped
    }
}

/// Compares expected and observed state and reports the result
pub struct Reconciler {
    inventory: Arc<dyn InventoryClient>,
    runtime: Arc<dyn RuntimeObserver>,
    dedupe: Option<DedupeCache>,
}

impl Reconciler {
    pub fn new(inventory: Arc<dyn InventoryClient>, runtime: Arc<dyn RuntimeObserver>) -> Self {
        Self {
            inventory,
            runtime,
            dedupe: None,
        }
    }

    /// Suppress reports whose state matches the last accepted one.
    pub fn with_dedupe(mut self, enabled: bool) -> Self {
        self.dedupe = enabled.then(DedupeCache::new);
        self
    }

    /// Run one cycle.
    ///
    /// A fetch or runtime failure abandons the cycle before any report is
    /// sent. A failed report is logged and the next workload is processed.
    #[instrument(skip(self), fields(backend = self.runtime.backend()))]
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let expected = self.inventory.fetch_expected_workloads().await?;
        let observed = self.runtime.list_running_instances().await?;

        debug!(
            expected = expected.len(),
            running = observed.len(),
            "Reconciling workloads"
        );

        let mut report = CycleReport {
            expected: expected.len(),
            running: observed.len(),
            ..Default::default()
        };

        if let Some(cache) = self.dedupe.as_mut() {
            cache.retain_only(expected.iter().map(|w| w.id));
            debug!(tracked = cache.len(), "Pruned dedupe cache");
        }

        for decision in decide(&expected, &observed) {
            let (id, state) = (decision.workload_id, decision.state);

            if self
                .dedupe
                .as_ref()
                .is_some_and(|cache| cache.is_unchanged(id, state))
            {
                debug!(workload_id = %id, workload = decision.name, %state, "State unchanged, not reporting");
                report.skipped += 1;
                continue;
            }

            match self.inventory.record_status(id, state).await {
                Ok(record) => {
                    info!(
                        workload_id = %id,
                        workload = decision.name,
                        %state,
                        record_id = %record.id,
                        "Recorded workload status"
                    );
                    match state {
                        ServerState::Started => report.started += 1,
                        ServerState::Stopped => report.stopped += 1,
                    }
                    if let Some(cache) = self.dedupe.as_mut() {
                        cache.remember(id, state);
                    }
                }
                Err(e) => {
                    warn!(
                        workload_id = %id,
                        workload = decision.name,
                        %state,
                        error = %e,
                        "Failed to record workload status"
                    );
                    report.failed.push(id);
                }
            }
        }

        Ok(report)
    }
}
