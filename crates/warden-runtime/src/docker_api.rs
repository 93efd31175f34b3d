//! Docker Engine API backend

use crate::error::{RuntimeResult, RuntimeUnavailableError};
use crate::observer::RuntimeObserver;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use warden_types::{RuntimeInstance, RuntimeSnapshot};

/// Container summary as returned by `GET /containers/json`.
#[derive(Debug, Deserialize)]
struct ContainerSummary {
    #[serde(rename = "Names", default)]
    names: Vec<String>,

    #[serde(rename = "State", default)]
    state: Option<String>,
}

/// Observer talking to the Docker Engine API over HTTP.
#[derive(Debug, Clone)]
pub struct DockerApiObserver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DockerApiObserver {
    /// Create an observer for `endpoint`, e.g. `tcp://127.0.0.1:2375`.
    pub fn new(endpoint: &str, timeout: Duration) -> RuntimeResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RuntimeUnavailableError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: normalize_endpoint(endpoint),
            timeout,
        })
    }

    async fn get(&self, path: &str) -> RuntimeResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RuntimeUnavailableError::CommandFailed(format!(
                "GET {} returned HTTP {}: {}",
                path,
                status.as_u16(),
                body.trim()
            )));
        }

        Ok(response)
    }

    fn map_transport(&self, err: reqwest::Error) -> RuntimeUnavailableError {
        if err.is_timeout() {
            RuntimeUnavailableError::Timeout(self.timeout)
        } else {
            RuntimeUnavailableError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl RuntimeObserver for DockerApiObserver {
    async fn list_running_instances(&self) -> RuntimeResult<RuntimeSnapshot> {
        let containers: Vec<ContainerSummary> = self
            .get("/containers/json")
            .await?
            .json()
            .await
            .map_err(|e| RuntimeUnavailableError::InvalidResponse(e.to_string()))?;

        let snapshot: RuntimeSnapshot = containers
            .into_iter()
            .filter(|c| c.state.as_deref().map_or(true, |s| s == "running"))
            .flat_map(|c| c.names)
            .map(|name| RuntimeInstance::new(strip_leading_slash(&name)))
            .collect();

        debug!(count = snapshot.len(), "Listed running containers via Docker API");
        Ok(snapshot)
    }

    async fn ping(&self) -> RuntimeResult<()> {
        self.get("/_ping").await.map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "docker-api"
    }
}

/// Engine API names carry one leading `/`; `docker ps` shows them without.
fn strip_leading_slash(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    match trimmed.strip_prefix("tcp://") {
        Some(rest) => format!("http://{}", rest),
        None if trimmed.starts_with("http://") || trimmed.starts_with("https://") => {
            trimmed.to_string()
        }
        None => format!("http://{}", trimmed),
    }
}
