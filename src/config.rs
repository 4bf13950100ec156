//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Runner configuration
    pub runner: RunnerConfig,
    /// Execution configuration
    pub execution: ExecutionConfig,
    /// Path to the agent registry file
    pub registry_path: PathBuf,
}

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the per-agent append-only log files
    pub log_dir: PathBuf,
    /// Interval used when an agent is registered without one
    pub default_interval: Duration,
    /// Cap on the in-memory log ring
    pub max_log_entries: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            default_interval: crate::state::DEFAULT_INTERVAL,
            max_log_entries: 1000,
        }
    }
}

/// Execution configuration
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Default timeout for one tick of agent execution (in seconds)
    pub default_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            runner: RunnerConfig {
                log_dir: env::var("ATOM_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("logs")),
                default_interval: Duration::from_secs(
                    env::var("ATOM_DEFAULT_INTERVAL_SECS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(3600),
                ),
                max_log_entries: env::var("ATOM_MAX_LOG_ENTRIES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            },
            execution: ExecutionConfig {
                default_timeout_secs: env::var("ATOM_EXECUTION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            registry_path: env::var("ATOM_AGENTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| crate::state::AgentRegistry::default_path()),
        }
    }
}
