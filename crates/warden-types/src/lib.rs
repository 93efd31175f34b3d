//! Warden Types - Core types for workload status reconciliation
//!
//! Warden keeps an inventory service's view of workload status in line with
//! what the container runtime actually runs. These types are shared by every
//! other Warden crate.
//!
//! ## Key Concepts
//!
//! - **Workload**: an entry the inventory service expects to be running
//! - **RuntimeSnapshot**: the set of running container names at one instant
//! - **ServerState**: the closed set of states Warden reports
//! - **StatusRecord**: an append-only history entry created by a report

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod ids;
pub mod instance;
pub mod status;
pub mod timestamp;
pub mod workload;

pub use ids::{LogId, WorkloadId};
pub use instance::{RuntimeInstance, RuntimeSnapshot};
pub use status::{ParseStateError, ServerState, StatusRecord};
pub use workload::{LatestLog, Workload};
