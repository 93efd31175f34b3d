//! Scheduler and reconciliation loop
//!
//! Each cycle:
//! - fetches the expected workloads from the inventory
//! - snapshots the running containers
//! - reports `started` or `stopped` for every expected workload
//!
//! Cycles run back to back on a fixed interval until shutdown.

mod dedupe;
mod diff;
mod reconciler;
mod runner;

pub use dedupe::DedupeCache;
pub use diff::{decide, Decision};
pub use reconciler::{CycleReport, Reconciler};
pub use runner::Scheduler;
