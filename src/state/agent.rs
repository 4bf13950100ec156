// Agent state records
// Plain data mutated by the runner; one AgentState per registered agent,
// one immutable AgentLog per lifecycle event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique identifier for an agent
pub type AgentId = String;

/// Default scheduling interval for a registered agent (one hour).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

/// Agent status enumeration
///
/// Represents the current lifecycle state of a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is registered but not scheduled
    Stopped,
    /// Agent has a live scheduling task
    Running,
    /// Agent is parked; resume with an explicit start
    Paused,
    /// Agent's last tick failed; terminal until restarted
    Error,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Stopped => write!(f, "stopped"),
            AgentStatus::Running => write!(f, "running"),
            AgentStatus::Paused => write!(f, "paused"),
            AgentStatus::Error => write!(f, "error"),
        }
    }
}

/// Per-agent scheduling state
///
/// Created on registration, mutated by the runner's loop on every tick,
/// never deleted for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    /// Identifier of the registered agent
    pub agent_id: AgentId,
    /// Current lifecycle status
    pub status: AgentStatus,
    /// Interval between ticks
    pub interval: Duration,
    /// Timestamp of the last successful tick
    pub last_run: Option<DateTime<Utc>>,
    /// Timestamp the next tick is due at
    pub next_run: Option<DateTime<Utc>>,
    /// Number of successful ticks
    pub run_count: u64,
    /// Number of failed ticks
    pub error_count: u64,
    /// Message from the most recent failure
    pub last_error: Option<String>,
}

impl AgentState {
    /// Create a fresh state record in `Stopped` for the given agent
    pub fn new(agent_id: impl Into<AgentId>, interval: Duration) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: AgentStatus::Stopped,
            interval,
            last_run: None,
            next_run: None,
            run_count: 0,
            error_count: 0,
            last_error: None,
        }
    }

    /// Record a successful tick: bump the run counter and advance timestamps
    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.run_count += 1;
        self.last_run = Some(now);
        self.next_run = chrono::Duration::from_std(self.interval)
            .ok()
            .map(|d| now + d);
    }

    /// Record a failed tick: bump the error counter and enter the terminal
    /// `Error` state
    pub fn record_failure(&mut self, message: String) {
        self.error_count += 1;
        self.last_error = Some(message);
        self.status = AgentStatus::Error;
        self.next_run = None;
    }
}

/// Severity tag for a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// Routine lifecycle event
    Info,
    /// Degraded but non-fatal condition
    Warning,
    /// Failed tick or other agent-level failure
    Error,
}

impl std::fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogSeverity::Info => write!(f, "INFO"),
            LogSeverity::Warning => write!(f, "WARNING"),
            LogSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// One immutable record per agent lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentLog {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Owning agent
    pub agent_id: AgentId,
    /// Severity tag
    pub severity: LogSeverity,
    /// Event name (registered, started, stopped, executing, completed, failed)
    pub event: String,
    /// Free-text detail
    pub details: String,
}

impl AgentLog {
    /// Create a log record stamped with the current time
    pub fn now(
        agent_id: impl Into<AgentId>,
        severity: LogSeverity,
        event: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            agent_id: agent_id.into(),
            severity,
            event: event.into(),
            details: details.into(),
        }
    }

    /// Render the record as one log-file line:
    /// `<ISO8601 timestamp> [<SEVERITY>] <event>: <details>`
    pub fn format_line(&self) -> String {
        format!(
            "{} [{}] {}: {}",
            self.timestamp.to_rfc3339(),
            self.severity,
            self.event,
            self.details
        )
    }
}
