//! In-memory inventory for tests.
//!
//! Serves a scripted workload list and appends every report to a history, the
//! way the real inventory would. Individual workloads can be set to fail.

use crate::client::InventoryClient;
use crate::error::{FetchError, FetchResult, RecordError, RecordResult, RequestError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use warden_types::{LogId, ServerState, StatusRecord, Workload, WorkloadId};

#[derive(Debug, Default)]
pub struct FakeInventory {
    workloads: Mutex<Vec<Workload>>,
    fail_fetch: Mutex<bool>,
    failing_records: Mutex<HashSet<WorkloadId>>,
    history: Mutex<Vec<StatusRecord>>,
    attempts: Mutex<Vec<(WorkloadId, ServerState)>>,
    fetches: AtomicI64,
    next_log_id: AtomicI64,
}

impl FakeInventory {
    pub fn new(workloads: Vec<Workload>) -> Self {
        Self {
            workloads: Mutex::new(workloads),
            ..Default::default()
        }
    }

    pub fn set_workloads(&self, workloads: Vec<Workload>) {
        *self.workloads.lock().unwrap() = workloads;
    }

    /// Make every subsequent fetch fail with a transport error.
    pub fn fail_fetch(&self, fail: bool) {
        *self.fail_fetch.lock().unwrap() = fail;
    }

    /// Make reports for `id` fail until cleared.
    pub fn fail_record(&self, id: WorkloadId, fail: bool) {
        let mut failing = self.failing_records.lock().unwrap();
        if fail {
            failing.insert(id);
        } else {
            failing.remove(&id);
        }
    }

    /// Successfully appended records, oldest first.
    pub fn history(&self) -> Vec<StatusRecord> {
        self.history.lock().unwrap().clone()
    }

    /// Every `record_status` invocation, including failed ones.
    pub fn attempts(&self) -> Vec<(WorkloadId, ServerState)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> i64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryClient for FakeInventory {
    async fn fetch_expected_workloads(&self) -> FetchResult<Vec<Workload>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if *self.fail_fetch.lock().unwrap() {
            return Err(FetchError(RequestError::Transport(
                "connection refused".to_string(),
            )));
        }
        Ok(self.workloads.lock().unwrap().clone())
    }

    async fn record_status(
        &self,
        workload_id: WorkloadId,
        state: ServerState,
    ) -> RecordResult<StatusRecord> {
        self.attempts.lock().unwrap().push((workload_id, state));

        if self.failing_records.lock().unwrap().contains(&workload_id) {
            return Err(RecordError::new(
                workload_id,
                state,
                RequestError::Status {
                    status: 500,
                    body: "internal error".to_string(),
                },
            ));
        }

        let record = StatusRecord {
            id: LogId::new(self.next_log_id.fetch_add(1, Ordering::SeqCst) + 1),
            server_id: workload_id,
            created: chrono::Utc::now(),
            state,
            error: None,
        };
        self.history.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
