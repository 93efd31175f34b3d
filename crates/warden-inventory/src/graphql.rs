//! HTTP client for the inventory's GraphQL endpoint

use crate::client::InventoryClient;
use crate::error::{FetchError, FetchResult, RecordError, RecordResult, RequestError};
use crate::queries::{
    CreateLogData, CreateLogVariables, GraphQlRequest, GraphQlResponse, ServersData,
    CREATE_LOG_MUTATION, CREATE_LOG_OPERATION, SERVERS_QUERY,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use warden_types::{ServerState, StatusRecord, Workload, WorkloadId};

/// Longest response body excerpt kept in a `Status` error
const MAX_ERROR_BODY: usize = 512;

/// GraphQL-over-HTTP implementation of [`InventoryClient`]
#[derive(Debug, Clone)]
pub struct GraphQlInventoryClient {
    client: Client,
    endpoint: String,
}

impl GraphQlInventoryClient {
    /// Create a client for `http://{host}:{port}/graphql`.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, RequestError> {
        Self::with_base_url(&format!("http://{}:{}", host, port), timeout)
    }

    /// Create a client for `{base_url}/graphql`.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/graphql", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a GraphQL document and return the `data` member.
    async fn execute<V, T>(&self, request: &GraphQlRequest<'_, V>) -> Result<T, RequestError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        let envelope: GraphQlResponse<T> = serde_json::from_slice(&body)
            .map_err(|e| RequestError::Malformed(e.to_string()))?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(RequestError::GraphQl(messages.join("; ")));
        }

        envelope.data.ok_or(RequestError::MissingField("data"))
    }
}

#[async_trait]
impl InventoryClient for GraphQlInventoryClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_expected_workloads(&self) -> FetchResult<Vec<Workload>> {
        debug!("Fetching expected workloads");

        let request = GraphQlRequest::<()> {
            query: SERVERS_QUERY,
            variables: None,
            operation_name: None,
        };

        let data: ServersData = self.execute(&request).await?;
        let workloads = data
            .servers
            .ok_or(FetchError(RequestError::MissingField("data.servers")))?;

        debug!(count = workloads.len(), "Fetched expected workloads");
        Ok(workloads)
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn record_status(
        &self,
        workload_id: WorkloadId,
        state: ServerState,
    ) -> RecordResult<StatusRecord> {
        let request = GraphQlRequest {
            query: CREATE_LOG_MUTATION,
            variables: Some(CreateLogVariables {
                id: workload_id.value(),
                state,
            }),
            operation_name: Some(CREATE_LOG_OPERATION),
        };

        debug!("Recording workload status");

        let data: CreateLogData = self
            .execute(&request)
            .await
            .map_err(|e| RecordError::new(workload_id, state, e))?;

        let record = data.create_server_log.ok_or_else(|| {
            RecordError::new(
                workload_id,
                state,
                RequestError::MissingField("data.createServerLog"),
            )
        })?;

        debug!(record_id = %record.id, "Recorded workload status");
        Ok(record)
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GraphQlInventoryClient {
        GraphQlInventoryClient::with_base_url(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_from_host_port() {
        let client = GraphQlInventoryClient::new("api", 5000, Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://api:5000/graphql");
    }

    #[test]
    fn test_truncate_long_body() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[tokio::test]
    async fn test_fetch_expected_workloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "servers": [
                        { "id": 1, "name": "mc1", "latestLog": null },
                        {
                            "id": "2",
                            "name": "mc2",
                            "latestLog": {
                                "id": 5,
                                "created": "2024-05-01T08:00:00",
                                "state": "started",
                                "error": null
                            }
                        }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let workloads = client_for(&server).await.fetch_expected_workloads().await.unwrap();

        assert_eq!(workloads.len(), 2);
        assert_eq!(workloads[0].name, "mc1");
        assert_eq!(workloads[1].id, WorkloadId::new(2));
        assert!(workloads[1].latest_log.is_some());
    }

    #[tokio::test]
    async fn test_fetch_tolerates_unfamiliar_latest_log() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "servers": [
                        { "id": 1, "name": "mc1" },
                        {
                            "id": 2,
                            "name": "mc2",
                            "latestLog": {
                                "state": "crashed",
                                "created": "Wed, 01 May 2024 08:00:00 GMT"
                            }
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let workloads = client_for(&server).await.fetch_expected_workloads().await.unwrap();

        assert_eq!(workloads.len(), 2);
        let log = workloads[1].latest_log.as_ref().unwrap();
        assert_eq!(log.state, "crashed");
        assert!(log.server_state().is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_servers_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_expected_workloads().await.unwrap_err();
        assert!(matches!(err.0, RequestError::MissingField("data.servers")));
    }

    #[tokio::test]
    async fn test_fetch_graphql_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "boom" }, { "message": "again" }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_expected_workloads().await.unwrap_err();
        match err.0 {
            RequestError::GraphQl(msg) => assert_eq!(msg, "boom; again"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error_and_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_expected_workloads().await.unwrap_err();
        assert!(matches!(err.0, RequestError::Status { status: 502, .. }));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_expected_workloads().await.unwrap_err();
        assert!(matches!(err.0, RequestError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_workload_without_id_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "servers": [{ "name": "mc1" }] }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_expected_workloads().await.unwrap_err();
        assert!(matches!(err.0, RequestError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_transport_error() {
        let client =
            GraphQlInventoryClient::with_base_url("http://127.0.0.1:1", Duration::from_secs(2))
                .unwrap();
        let err = client.fetch_expected_workloads().await.unwrap_err();
        assert!(matches!(
            err.0,
            RequestError::Transport(_) | RequestError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_record_status_sends_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "operationName": "createLog",
                "variables": { "id": 3, "state": "stopped" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "createServerLog": {
                        "id": 77,
                        "server_id": 3,
                        "created": "2024-05-01T08:00:00+00:00",
                        "state": "stopped",
                        "error": null
                    }
                }
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let record = client
            .record_status(WorkloadId::new(3), ServerState::Stopped)
            .await
            .unwrap();
        assert_eq!(record.server_id, WorkloadId::new(3));
        assert_eq!(record.state, ServerState::Stopped);

        // Same arguments again: a second request, never deduplicated client-side.
        client
            .record_status(WorkloadId::new(3), ServerState::Stopped)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_status_missing_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "createServerLog": null } })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .record_status(WorkloadId::new(9), ServerState::Started)
            .await
            .unwrap_err();

        assert_eq!(err.workload_id, WorkloadId::new(9));
        assert!(matches!(
            err.source,
            RequestError::MissingField("data.createServerLog")
        ));
    }
}
