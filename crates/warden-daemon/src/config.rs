//! Configuration for warden-daemon

use crate::error::{DaemonError, DaemonResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Inventory service connection
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Container runtime backend
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Reconcile loop
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inventory service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Hostname of the inventory API
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port of the inventory API
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl InventoryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout_secs)
    }
}

/// Which runtime backend produces snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeBackend {
    /// `docker ps`
    #[default]
    Cli,

    /// Docker Engine API over TCP
    Api,
}

/// Container runtime backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub backend: RuntimeBackend,

    /// docker binary used by the CLI backend
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// Engine API endpoint used by the API backend, e.g. `tcp://127.0.0.1:2375`
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: RuntimeBackend::Cli,
            docker_bin: default_docker_bin(),
            api_endpoint: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl RuntimeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout_secs)
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between reconcile cycles
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: f64,

    /// Skip reports whose state matches the last one sent for that workload
    #[serde(default)]
    pub dedupe: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval(),
            dedupe: false,
        }
    }
}

impl SchedulerConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(self.update_interval_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_api_host() -> String {
    "api".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_request_timeout() -> f64 {
    10.0
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_update_interval() -> f64 {
    300.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WardenConfig {
    /// Load configuration from defaults, an optional file and `WARDEN_*` variables
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`WardenConfig::load`], reading variables from `env` instead of the process
    pub fn load_with_env(
        path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&WardenConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Only section keys such as WARDEN_SCHEDULER__UPDATE_INTERVAL_SECS=60.
        // Flat WARDEN_* names belong to the command line.
        let env: config::Map<String, String> = env
            .unwrap_or_else(|| std::env::vars().collect())
            .into_iter()
            .filter(|(key, _)| key.contains("__"))
            .collect();

        builder = builder.add_source(
            config::Environment::with_prefix("WARDEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject settings the daemon cannot run with
    pub fn validate(&self) -> DaemonResult<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if self.inventory.host.trim().is_empty() {
            return Err(DaemonError::Config("inventory host must not be empty".into()));
        }
        if self.inventory.port == 0 {
            return Err(DaemonError::Config("inventory port must not be 0".into()));
        }
        if !positive(self.scheduler.update_interval_secs) {
            return Err(DaemonError::Config(format!(
                "update interval must be a positive number of seconds, got {}",
                self.scheduler.update_interval_secs
            )));
        }
        if !positive(self.inventory.request_timeout_secs)
            || !positive(self.runtime.request_timeout_secs)
        {
            return Err(DaemonError::Config(
                "request timeouts must be positive".into(),
            ));
        }
        if self.runtime.backend == RuntimeBackend::Api && self.runtime.api_endpoint.is_none() {
            return Err(DaemonError::Config(
                "runtime backend `api` requires an API endpoint (DOCKER_HOST)".into(),
            ));
        }
        Ok(())
    }
}
