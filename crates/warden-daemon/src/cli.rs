//! Command-line flags for `wardend`

use crate::config::{RuntimeBackend, WardenConfig};
use clap::{Parser, ValueEnum};

/// Runtime backend as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Cli,
    Api,
}

impl From<BackendArg> for RuntimeBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cli => RuntimeBackend::Cli,
            BackendArg::Api => RuntimeBackend::Api,
        }
    }
}

/// Warden daemon CLI
#[derive(Debug, Parser)]
#[command(name = "wardend")]
#[command(about = "Warden - reports container liveness to the inventory service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WARDEN_CONFIG")]
    pub config: Option<String>,

    /// Inventory API hostname
    #[arg(long, env = "API_HOST")]
    pub api_host: Option<String>,

    /// Inventory API port
    #[arg(long, env = "API_PORT")]
    pub api_port: Option<u16>,

    /// Seconds between reconcile cycles
    #[arg(long, env = "UPDATE_INTERVAL")]
    pub update_interval: Option<f64>,

    /// Container runtime backend
    #[arg(long, value_enum, env = "WARDEN_RUNTIME_BACKEND")]
    pub runtime: Option<BackendArg>,

    /// Docker Engine endpoint; a tcp:// or http:// value selects the API backend
    #[arg(long, env = "DOCKER_HOST")]
    pub docker_host: Option<String>,

    /// docker binary for the CLI backend
    #[arg(long, env = "WARDEN_DOCKER_BIN")]
    pub docker_bin: Option<String>,

    /// Only report a workload when its state changes
    #[arg(long, env = "WARDEN_DEDUPE")]
    pub dedupe: bool,

    /// Log level
    #[arg(long, env = "WARDEN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "WARDEN_LOG_JSON")]
    pub json: bool,
}

impl Cli {
    /// Override loaded configuration with flags that were given
    pub fn apply(&self, config: &mut WardenConfig) {
        if let Some(host) = &self.api_host {
            config.inventory.host = host.clone();
        }
        if let Some(port) = self.api_port {
            config.inventory.port = port;
        }
        if let Some(interval) = self.update_interval {
            config.scheduler.update_interval_secs = interval;
        }
        if let Some(host) = &self.docker_host {
            // unix:// sockets are left to the docker CLI, which reads DOCKER_HOST itself.
            if !host.starts_with("unix://") {
                config.runtime.api_endpoint = Some(host.clone());
                if self.runtime.is_none() {
                    config.runtime.backend = RuntimeBackend::Api;
                }
            }
        }
        if let Some(backend) = self.runtime {
            config.runtime.backend = backend.into();
        }
        if let Some(bin) = &self.docker_bin {
            config.runtime.docker_bin = bin.clone();
        }
        if self.dedupe {
            config.scheduler.dedupe = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wardend").chain(args.iter().copied())).unwrap()
    }

    fn no_flags() -> Cli {
        Cli {
            config: None,
            api_host: None,
            api_port: None,
            update_interval: None,
            runtime: None,
            docker_host: None,
            docker_bin: None,
            dedupe: false,
            log_level: None,
            json: false,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--api-host",
            "inventory",
            "--api-port",
            "8080",
            "--update-interval",
            "2.5",
            "--dedupe",
        ]);
        let mut config = WardenConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.inventory.host, "inventory");
        assert_eq!(config.inventory.port, 8080);
        assert_eq!(config.scheduler.update_interval_secs, 2.5);
        assert!(config.scheduler.dedupe);
    }

    #[test]
    fn test_backend_env_does_not_collide_with_config_section() {
        let command = Cli::command();
        let runtime = command
            .get_arguments()
            .find(|arg| arg.get_id() == "runtime")
            .unwrap();
        assert_eq!(
            runtime.get_env().and_then(|env| env.to_str()),
            Some("WARDEN_RUNTIME_BACKEND")
        );
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = no_flags();
        let mut config = WardenConfig::default();
        config.scheduler.dedupe = true;
        cli.apply(&mut config);

        assert_eq!(config.inventory.host, "api");
        assert!(config.scheduler.dedupe);
    }

    #[test]
    fn test_tcp_docker_host_selects_api_backend() {
        let mut cli = no_flags();
        cli.docker_host = Some("tcp://10.0.0.5:2375".to_string());

        let mut config = WardenConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.runtime.backend, RuntimeBackend::Api);
        assert_eq!(config.runtime.api_endpoint.as_deref(), Some("tcp://10.0.0.5:2375"));

        cli.runtime = Some(BackendArg::Cli);
        let mut config = WardenConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.runtime.backend, RuntimeBackend::Cli);
    }

    #[test]
    fn test_unix_docker_host_ignored() {
        let mut cli = no_flags();
        cli.docker_host = Some("unix:///var/run/docker.sock".to_string());

        let mut config = WardenConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.runtime.backend, RuntimeBackend::Cli);
        assert!(config.runtime.api_endpoint.is_none());
    }
}
