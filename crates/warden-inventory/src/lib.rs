//! Warden Inventory - client for the workload inventory service
//!
//! The inventory is the system of record: it declares which workloads should
//! exist and accumulates their status history. Warden talks to it through two
//! GraphQL operations:
//!
//! - the `servers` query, listing expected workloads
//! - the `createServerLog` mutation, appending a status record
//!
//! [`InventoryClient`] is the seam the reconciler depends on;
//! [`GraphQlInventoryClient`] is the HTTP implementation.

#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod graphql;
mod queries;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::InventoryClient;
pub use error::{FetchError, RecordError, RequestError};
pub use graphql::GraphQlInventoryClient;
