//! Warden Daemon library
//!
//! This module provides the core components for the Warden daemon:
//! - Configuration loading and validation
//! - The reconcile cycle and its scheduling loop
//! - Daemon lifecycle management

pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod scheduler;

pub use config::WardenConfig;
pub use daemon::Daemon;
pub use error::{CycleError, DaemonError, DaemonResult};
pub use scheduler::{CycleReport, Reconciler, Scheduler};
