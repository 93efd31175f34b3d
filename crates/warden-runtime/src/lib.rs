//! Warden Runtime - snapshots of running containers
//!
//! The observer answers one question per cycle: which container names are
//! running right now? Two backends are provided:
//!
//! - [`DockerApiObserver`]: Docker Engine API over TCP (`DOCKER_HOST=tcp://...`)
//! - [`DockerCliObserver`]: the `docker ps` command, for the local unix socket
//!
//! Neither keeps state between calls.

#![deny(unsafe_code)]

pub mod docker_api;
pub mod docker_cli;
pub mod error;
pub mod observer;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use docker_api::DockerApiObserver;
pub use docker_cli::DockerCliObserver;
pub use error::{RuntimeResult, RuntimeUnavailableError};
pub use observer::RuntimeObserver;
