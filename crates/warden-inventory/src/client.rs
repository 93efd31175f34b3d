//! The inventory seam used by the reconciler.

use crate::error::{FetchResult, RecordResult};
use async_trait::async_trait;
use std::sync::Arc;
use warden_types::{ServerState, StatusRecord, Workload, WorkloadId};

/// Read and write access to the inventory service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// List the workloads that should be tracked, in service order.
    async fn fetch_expected_workloads(&self) -> FetchResult<Vec<Workload>>;

    /// Append a status record for a workload.
    ///
    /// Not idempotent: two calls with the same arguments create two records.
    async fn record_status(
        &self,
        workload_id: WorkloadId,
        state: ServerState,
    ) -> RecordResult<StatusRecord>;
}

#[async_trait]
impl<T: InventoryClient + ?Sized> InventoryClient for Arc<T> {
    async fn fetch_expected_workloads(&self) -> FetchResult<Vec<Workload>> {
        (**self).fetch_expected_workloads().await
    }

    async fn record_status(
        &self,
        workload_id: WorkloadId,
        state: ServerState,
    ) -> RecordResult<StatusRecord> {
        (**self).record_status(workload_id, state).await
    }
}
