//! The agent runner service
//!
//! Owns the registry of agent states and one spawned task per started agent.
//! Each task loops: execute the injected callback, update the agent's state,
//! sleep the agent's interval. A failed tick parks the agent in the terminal
//! `Error` state; there is no automatic restart or backoff — recovery is an
//! explicit `start_agent` after the operator has addressed the cause.

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::executor::AgentExecutor;
use crate::runner::sink::LogSink;
use crate::state::{AgentId, AgentLog, AgentState, AgentStatus, LogSeverity};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Default number of entries returned by a log query
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// Summary view over all registered agents
#[derive(Debug, Serialize)]
pub struct RunnerSummary {
    /// Number of registered agents
    pub total_agents: usize,
    /// Number of agents currently in `Running`
    pub running: usize,
    /// Number of agents parked in `Error`
    pub errored: usize,
    /// Per-agent status map
    pub agents: HashMap<AgentId, AgentStatus>,
}

/// Schedules zero or more independently named periodic agents
///
/// Constructed explicitly and owned by the composition root; shut down with
/// [`AgentRunner::shutdown`]. Invariant: at most one live task per agent id.
pub struct AgentRunner {
    executor: Arc<dyn AgentExecutor>,
    agents: Arc<RwLock<HashMap<AgentId, AgentState>>>,
    tasks: Mutex<HashMap<AgentId, JoinHandle<()>>>,
    sink: Arc<LogSink>,
    default_interval: Duration,
}

impl AgentRunner {
    /// Create a runner around the given execution callback
    pub fn new(executor: Arc<dyn AgentExecutor>, config: RunnerConfig) -> Self {
        Self {
            executor,
            agents: Arc::new(RwLock::new(HashMap::new())),
            tasks: Mutex::new(HashMap::new()),
            sink: Arc::new(LogSink::new(config.log_dir, config.max_log_entries)),
            default_interval: config.default_interval,
        }
    }

    /// Register an agent with the configured default interval
    ///
    /// Idempotent: registering an existing id resets its state to a fresh
    /// `Stopped` record. Never starts execution.
    pub async fn register_agent(&self, agent_id: &str) {
        self.register_agent_with_interval(agent_id, self.default_interval)
            .await;
    }

    /// Register an agent with an explicit interval between ticks
    pub async fn register_agent_with_interval(&self, agent_id: &str, interval: Duration) {
        let mut agents = self.agents.write().await;
        agents.insert(
            agent_id.to_string(),
            AgentState::new(agent_id, interval),
        );
        drop(agents);

        info!(agent_id = %agent_id, interval_secs = interval.as_secs(), "Agent registered");
        self.sink
            .record(AgentLog::now(
                agent_id,
                LogSeverity::Info,
                "registered",
                format!("interval {:?}", interval),
            ))
            .await;
    }

    /// Start an agent's scheduling loop
    ///
    /// Unknown ids are an error. Starting an agent that is already `Running`
    /// is a no-op; any stale task is aborted before a new one is spawned, so
    /// at most one live task exists per agent.
    pub async fn start_agent(&self, agent_id: &str) -> Result<(), RunnerError> {
        {
            let mut agents = self.agents.write().await;
            let state = agents
                .get_mut(agent_id)
                .ok_or_else(|| RunnerError::AgentNotFound(agent_id.to_string()))?;

            if state.status == AgentStatus::Running {
                return Ok(());
            }
            state.status = AgentStatus::Running;
        }

        let mut tasks = self.tasks.lock().await;
        if let Some(stale) = tasks.remove(agent_id) {
            stale.abort();
        }

        info!(agent_id = %agent_id, "Agent started");
        self.sink
            .record(AgentLog::now(
                agent_id,
                LogSeverity::Info,
                "started",
                "scheduling loop spawned",
            ))
            .await;

        let handle = tokio::spawn(run_loop(
            agent_id.to_string(),
            self.executor.clone(),
            self.agents.clone(),
            self.sink.clone(),
        ));
        tasks.insert(agent_id.to_string(), handle);
        Ok(())
    }

    /// Stop an agent: cancel its task if present and mark it `Stopped`
    ///
    /// Safe to call on an agent with no running task.
    pub async fn stop_agent(&self, agent_id: &str) -> Result<(), RunnerError> {
        self.halt_agent(agent_id, AgentStatus::Stopped, "stopped")
            .await
    }

    /// Park an agent in `Paused`; resume with an explicit `start_agent`
    pub async fn pause_agent(&self, agent_id: &str) -> Result<(), RunnerError> {
        self.halt_agent(agent_id, AgentStatus::Paused, "paused")
            .await
    }

    async fn halt_agent(
        &self,
        agent_id: &str,
        status: AgentStatus,
        event: &str,
    ) -> Result<(), RunnerError> {
        {
            let mut agents = self.agents.write().await;
            let state = agents
                .get_mut(agent_id)
                .ok_or_else(|| RunnerError::AgentNotFound(agent_id.to_string()))?;
            state.status = status;
        }

        let mut tasks = self.tasks.lock().await;
        if let Some(handle) = tasks.remove(agent_id) {
            handle.abort();
        }
        drop(tasks);

        info!(agent_id = %agent_id, status = %status, "Agent halted");
        self.sink
            .record(AgentLog::now(
                agent_id,
                LogSeverity::Info,
                event,
                "scheduling loop cancelled",
            ))
            .await;
        Ok(())
    }

    /// Cancel every live task, join them, and mark running agents `Stopped`
    pub async fn shutdown(&self) {
        let drained: Vec<(AgentId, JoinHandle<()>)> =
            self.tasks.lock().await.drain().collect();

        for (agent_id, handle) in drained {
            handle.abort();
            // Cancellation is the expected outcome here.
            let _ = handle.await;
            debug!(agent_id = %agent_id, "Agent task joined");
        }

        let halted: Vec<AgentId> = {
            let mut agents = self.agents.write().await;
            let mut halted = Vec::new();
            for state in agents.values_mut() {
                if state.status == AgentStatus::Running {
                    state.status = AgentStatus::Stopped;
                    halted.push(state.agent_id.clone());
                }
            }
            halted
        };

        for agent_id in halted {
            self.sink
                .record(AgentLog::now(
                    &agent_id,
                    LogSeverity::Info,
                    "stopped",
                    "runner shutdown",
                ))
                .await;
        }
        info!("Runner shutdown complete");
    }

    /// Full state snapshot for one agent; pure read
    pub async fn agent_status(&self, agent_id: &str) -> Result<AgentState, RunnerError> {
        let agents = self.agents.read().await;
        agents
            .get(agent_id)
            .cloned()
            .ok_or_else(|| RunnerError::AgentNotFound(agent_id.to_string()))
    }

    /// Summary over all registered agents; pure read
    pub async fn status_summary(&self) -> RunnerSummary {
        let agents = self.agents.read().await;
        let mut summary = RunnerSummary {
            total_agents: agents.len(),
            running: 0,
            errored: 0,
            agents: HashMap::with_capacity(agents.len()),
        };
        for (id, state) in agents.iter() {
            match state.status {
                AgentStatus::Running => summary.running += 1,
                AgentStatus::Error => summary.errored += 1,
                _ => {}
            }
            summary.agents.insert(id.clone(), state.status);
        }
        summary
    }

    /// Most recent `limit` log entries in chronological order, optionally
    /// filtered to one agent
    pub async fn get_logs(&self, agent_id: Option<&str>, limit: usize) -> Vec<AgentLog> {
        self.sink.recent(agent_id, limit).await
    }

    /// Number of live scheduling tasks (finished handles are pruned)
    pub async fn active_task_count(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.len()
    }
}

/// Per-agent scheduling loop
///
/// Runs until the agent leaves `Running`, a tick fails, or the task is
/// aborted. Abort is cooperative: it takes effect at the next await point
/// (the executor call or the sleep).
async fn run_loop(
    agent_id: AgentId,
    executor: Arc<dyn AgentExecutor>,
    agents: Arc<RwLock<HashMap<AgentId, AgentState>>>,
    sink: Arc<LogSink>,
) {
    loop {
        let interval = {
            let agents = agents.read().await;
            match agents.get(&agent_id) {
                Some(state) if state.status == AgentStatus::Running => state.interval,
                _ => break,
            }
        };

        debug!(agent_id = %agent_id, "Executing agent tick");
        sink.record(AgentLog::now(
            &agent_id,
            LogSeverity::Info,
            "executing",
            "tick begin",
        ))
        .await;

        match executor.execute(&agent_id).await {
            Ok(_output) => {
                let run_count = {
                    let mut agents = agents.write().await;
                    match agents.get_mut(&agent_id) {
                        Some(state) => {
                            state.record_success(Utc::now());
                            state.run_count
                        }
                        None => break,
                    }
                };
                sink.record(AgentLog::now(
                    &agent_id,
                    LogSeverity::Info,
                    "completed",
                    format!("tick ok (run_count={})", run_count),
                ))
                .await;
            }
            Err(e) => {
                {
                    let mut agents = agents.write().await;
                    if let Some(state) = agents.get_mut(&agent_id) {
                        state.record_failure(e.to_string());
                    }
                }
                error!(
                    agent_id = %agent_id,
                    error = %e,
                    "Agent tick failed; agent parked in error state"
                );
                sink.record(AgentLog::now(
                    &agent_id,
                    LogSeverity::Error,
                    "failed",
                    e.to_string(),
                ))
                .await;
                break;
            }
        }

        tokio::time::sleep(interval).await;
    }
}
