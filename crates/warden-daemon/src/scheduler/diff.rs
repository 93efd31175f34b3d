//! Expected vs observed comparison.

use warden_types::{RuntimeSnapshot, ServerState, Workload, WorkloadId};

/// State to report for one expected workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision<'a> {
    pub workload_id: WorkloadId,
    pub name: &'a str,
    pub state: ServerState,
}

/// One decision per expected workload, in inventory order.
///
/// A workload is `started` iff a running container has exactly its name.
pub fn decide<'a>(expected: &'a [Workload], observed: &RuntimeSnapshot) -> Vec<Decision<'a>> {
    expected
        .iter()
        .map(|w| Decision {
            workload_id: w.id,
            name: &w.name,
            state: ServerState::from_running(observed.contains(&w.name)),
        })
        .collect()
}
