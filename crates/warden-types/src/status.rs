//! Reported server states and the history records they produce.

use crate::{LogId, WorkloadId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// State Warden reports for a workload.
///
/// Mirrors the inventory's `ServerLogState` enum; values travel lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// At least one running container carries the workload's name
    Started,

    /// No running container carries the workload's name
    Stopped,
}

impl ServerState {
    /// State implied by presence in the runtime snapshot.
    pub fn from_running(is_running: bool) -> Self {
        if is_running {
            Self::Started
        } else {
            Self::Stopped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown server state: {0}")]
pub struct ParseStateError(pub String);

impl FromStr for ServerState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(Self::Started),
            "stopped" => Ok(Self::Stopped),
            other => Err(ParseStateError(other.to_string())),
        }
    }
}

/// A status history entry, as echoed back by the inventory after a report.
///
/// Records are append-only: Warden never updates or deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: LogId,

    /// Workload the record belongs to
    pub server_id: WorkloadId,

    /// Creation time assigned by the inventory
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created: DateTime<Utc>,

    pub state: ServerState,

    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_running() {
        assert_eq!(ServerState::from_running(true), ServerState::Started);
        assert_eq!(ServerState::from_running(false), ServerState::Stopped);
    }

    #[test]
    fn test_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&ServerState::Stopped).unwrap(),
            "\"stopped\""
        );
        assert_eq!("started".parse::<ServerState>().unwrap(), ServerState::Started);
        assert!("Started".parse::<ServerState>().is_err());
    }

    #[test]
    fn test_record_deserialize() {
        let record: StatusRecord = serde_json::from_value(serde_json::json!({
            "id": "41",
            "server_id": 2,
            "created": "2024-05-01T08:00:00",
            "state": "started",
            "error": null
        }))
        .unwrap();

        assert_eq!(record.id, LogId::new(41));
        assert_eq!(record.server_id, WorkloadId::new(2));
        assert_eq!(record.state, ServerState::Started);
        assert!(record.error.is_none());
    }
}
