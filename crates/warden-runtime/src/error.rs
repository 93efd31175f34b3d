//! Error types for warden-runtime.

use std::time::Duration;
use thiserror::Error;

/// The container runtime could not produce a snapshot.
///
/// Always cycle-fatal: without observed state no status can be inferred.
#[derive(Debug, Error)]
pub enum RuntimeUnavailableError {
    /// Runtime could not be reached (socket, DNS, missing binary)
    #[error("container runtime unreachable: {0}")]
    Unreachable(String),

    /// Runtime did not answer in time
    #[error("container runtime timed out after {0:?}")]
    Timeout(Duration),

    /// Runtime answered with a failure
    #[error("container runtime command failed: {0}")]
    CommandFailed(String),

    /// Runtime answered with something we cannot read
    #[error("unexpected container runtime response: {0}")]
    InvalidResponse(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeUnavailableError>;
