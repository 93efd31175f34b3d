//! Error types for warden-daemon

use thiserror::Error;
use warden_inventory::{FetchError, RequestError};
use warden_runtime::RuntimeUnavailableError;

/// Daemon-level errors. Only raised at startup or shutdown; never from inside the loop.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Runtime unreachable at startup
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeUnavailableError),

    /// Inventory client could not be built
    #[error("Inventory error: {0}")]
    Inventory(#[from] RequestError),

    /// Scheduler task ended abnormally
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for DaemonError {
    fn from(err: config::ConfigError) -> Self {
        DaemonError::Config(err.to_string())
    }
}

/// Errors that abandon a whole reconcile cycle
#[derive(Debug, Error)]
pub enum CycleError {
    /// Expected workloads could not be read
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Running containers could not be listed
    #[error(transparent)]
    Runtime(#[from] RuntimeUnavailableError),
}

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
