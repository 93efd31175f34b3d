//! `docker` CLI backend

use crate::error::{RuntimeResult, RuntimeUnavailableError};
use crate::observer::RuntimeObserver;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;
use warden_types::{RuntimeInstance, RuntimeSnapshot};

/// Observer shelling out to `docker ps`.
#[derive(Debug, Clone)]
pub struct DockerCliObserver {
    bin_path: PathBuf,
    timeout: Duration,
}

impl DockerCliObserver {
    pub fn new(bin_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            bin_path: bin_path.into(),
            timeout,
        }
    }

    async fn run(&self, args: &[&str]) -> RuntimeResult<String> {
        let mut command = Command::new(&self.bin_path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| RuntimeUnavailableError::Timeout(self.timeout))?
            .map_err(|e| {
                RuntimeUnavailableError::Unreachable(format!(
                    "failed to execute {}: {}",
                    self.bin_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeUnavailableError::CommandFailed(format!(
                "{} {} exited with {}: {}",
                self.bin_path.display(),
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RuntimeUnavailableError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RuntimeObserver for DockerCliObserver {
    async fn list_running_instances(&self) -> RuntimeResult<RuntimeSnapshot> {
        let stdout = self.run(&["ps", "--format", "{{.Names}}"]).await?;
        let snapshot = parse_names(&stdout);

        debug!(count = snapshot.len(), "Listed running containers via docker CLI");
        Ok(snapshot)
    }

    async fn ping(&self) -> RuntimeResult<()> {
        self.run(&["version", "--format", "{{.Server.Version}}"])
            .await
            .map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "docker-cli"
    }
}

/// One container per line; a container with several names lists them comma-separated.
fn parse_names(stdout: &str) -> RuntimeSnapshot {
    stdout
        .lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(RuntimeInstance::new)
        .collect()
}
