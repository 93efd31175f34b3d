//! Opt-in suppression of repeated identical reports.
//!
//! Holds the last state successfully reported per workload. In-memory only:
//! a restart clears it and every workload is reported again.

use std::collections::{HashMap, HashSet};
use warden_types::{ServerState, WorkloadId};

#[derive(Debug, Default)]
pub struct DedupeCache {
    last_reported: HashMap<WorkloadId, ServerState>,
}

impl DedupeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `state` is what was last reported for `id`.
    pub fn is_unchanged(&self, id: WorkloadId, state: ServerState) -> bool {
        self.last_reported.get(&id) == Some(&state)
    }

    /// Call only after the inventory accepted the report.
    pub fn remember(&mut self, id: WorkloadId, state: ServerState) {
        self.last_reported.insert(id, state);
    }

    /// Drop workloads the inventory no longer lists.
    pub fn retain_only(&mut self, expected: impl IntoIterator<Item = WorkloadId>) {
        let keep: HashSet<_> = expected.into_iter().collect();
        self.last_reported.retain(|id, _| keep.contains(id));
    }

    pub(crate) fn len(&self) -> usize {
        self.last_reported.len()
    }
}
