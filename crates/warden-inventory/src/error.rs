//! Error types for warden-inventory.

use thiserror::Error;
use warden_types::{ServerState, WorkloadId};

/// Why a single request to the inventory failed.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection, DNS or I/O failure
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("inventory returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// GraphQL `errors` in the response document
    #[error("inventory reported errors: {0}")]
    GraphQl(String),

    /// Body is not the JSON shape we expect
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A required field was null or absent
    #[error("response missing field `{0}`")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_decode() {
            RequestError::Malformed(err.to_string())
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}

/// Reading the expected workload set failed. Aborts the current cycle.
#[derive(Debug, Error)]
#[error("failed to fetch expected workloads: {0}")]
pub struct FetchError(#[from] pub RequestError);

/// Recording a status for one workload failed. Affects that workload only.
#[derive(Debug, Error)]
#[error("failed to record state {state} for workload {workload_id}: {source}")]
pub struct RecordError {
    pub workload_id: WorkloadId,
    pub state: ServerState,
    #[source]
    pub source: RequestError,
}

impl RecordError {
    pub fn new(workload_id: WorkloadId, state: ServerState, source: RequestError) -> Self {
        Self {
            workload_id,
            state,
            source,
        }
    }
}

/// Result type for inventory reads.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for inventory writes.
pub type RecordResult<T> = Result<T, RecordError>;
