//! Expected workloads, as declared by the inventory service.

use crate::{timestamp, LogId, ServerState, WorkloadId};
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A workload the inventory expects to be tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    /// Inventory-assigned identifier
    pub id: WorkloadId,

    /// Correlation key against running container names
    pub name: String,

    /// Most recent status entry; fetched but not used for decisions.
    /// An entry that cannot be read is dropped instead of failing the fetch.
    #[serde(default, deserialize_with = "lenient_latest_log")]
    pub latest_log: Option<LatestLog>,
}

impl Workload {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: WorkloadId::new(id),
            name: name.into(),
            latest_log: None,
        }
    }
}

/// Last recorded status of a workload, kept as the inventory sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestLog {
    #[serde(default)]
    pub id: Option<LogId>,

    #[serde(default)]
    pub created: Option<String>,

    /// Raw state; the inventory may know states beyond `started`/`stopped`
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub error: Option<String>,
}

impl LatestLog {
    /// The recorded state, if it is one this daemon reports
    pub fn server_state(&self) -> Option<ServerState> {
        self.state.parse().ok()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(timestamp::parse)
    }
}

fn lenient_latest_log<'de, D>(deserializer: D) -> Result<Option<LatestLog>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slot {
        Log(LatestLog),
        Unreadable(IgnoredAny),
    }

    Ok(match Option::<Slot>::deserialize(deserializer)? {
        Some(Slot::Log(log)) => Some(log),
        Some(Slot::Unreadable(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_without_log() {
        let w: Workload =
            serde_json::from_value(serde_json::json!({ "id": 1, "name": "mc1", "latestLog": null }))
                .unwrap();
        assert_eq!(w, Workload::new(1, "mc1"));
    }

    #[test]
    fn test_workload_with_log_and_extra_fields() {
        let w: Workload = serde_json::from_value(serde_json::json!({
            "id": "2",
            "name": "mc2",
            "owner": "ignored",
            "latestLog": {
                "id": 9,
                "created": "2024-05-01T08:00:00+00:00",
                "state": "stopped",
                "error": "exit 137"
            }
        }))
        .unwrap();

        let log = w.latest_log.unwrap();
        assert_eq!(log.server_state(), Some(ServerState::Stopped));
        assert_eq!(log.error.as_deref(), Some("exit 137"));
        assert!(log.created_at().is_some());
    }

    #[test]
    fn test_unknown_state_and_timestamp_are_kept_raw() {
        let w: Workload = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "mc2",
            "latestLog": { "state": "crashed", "created": "Wed, 01 May 2024 08:00:00 GMT" }
        }))
        .unwrap();

        let log = w.latest_log.unwrap();
        assert_eq!(log.state, "crashed");
        assert_eq!(log.server_state(), None);
        assert_eq!(log.created_at(), None);
        assert_eq!(log.id, None);
    }

    #[test]
    fn test_unreadable_latest_log_is_dropped() {
        let w: Workload = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "mc3",
            "latestLog": { "id": "not-a-number", "state": 7 }
        }))
        .unwrap();
        assert_eq!(w, Workload::new(3, "mc3"));

        let w: Workload =
            serde_json::from_value(serde_json::json!({ "id": 3, "name": "mc3", "latestLog": "gone" }))
                .unwrap();
        assert!(w.latest_log.is_none());
    }

    #[test]
    fn test_workload_missing_name_is_rejected() {
        assert!(serde_json::from_value::<Workload>(serde_json::json!({ "id": 1 })).is_err());
    }
}
