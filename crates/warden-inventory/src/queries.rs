//! GraphQL documents and response envelopes.

use serde::{Deserialize, Serialize};
use warden_types::{ServerState, StatusRecord, Workload};

pub(crate) const SERVERS_QUERY: &str = "query {
  servers {
    id,
    name,
    latestLog {
      id
      created
      state
      error
    }
  }
}";

pub(crate) const CREATE_LOG_MUTATION: &str = "mutation createLog($id: Int!, $state: ServerLogState!) {
  createServerLog(serverId: $id, state: $state) {
    id
    server_id
    created
    state
    error
  }
}";

pub(crate) const CREATE_LOG_OPERATION: &str = "createLog";

/// Request body sent to the `/graphql` endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateLogVariables {
    pub id: i64,
    pub state: ServerState,
}

/// Response envelope; extra top-level keys are ignored
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServersData {
    pub servers: Option<Vec<Workload>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateLogData {
    pub create_server_log: Option<StatusRecord>,
}
