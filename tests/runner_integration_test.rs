//! Integration tests for the agent runner end-to-end lifecycle
//!
//! These tests exercise the public crate surface the way the daemon does:
//! registry file -> command executor -> runner -> status/log reads.

use async_trait::async_trait;
use atom_agent_runner::config::RunnerConfig;
use atom_agent_runner::executor::{AgentExecutor, CommandExecutor, ExecutionError};
use atom_agent_runner::runner::{AgentRunner, DEFAULT_LOG_LIMIT};
use atom_agent_runner::state::{AgentRegistry, AgentSpec, AgentStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn runner_config(log_dir: &std::path::Path) -> RunnerConfig {
    RunnerConfig {
        log_dir: log_dir.to_path_buf(),
        default_interval: Duration::from_secs(3600),
        max_log_entries: 100,
    }
}

/// Counting executor used where subprocess behavior is irrelevant
struct CountingExecutor {
    calls: AtomicU32,
}

#[async_trait]
impl AgentExecutor for CountingExecutor {
    async fn execute(&self, _agent_id: &str) -> Result<String, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("ok".to_string())
    }
}

/// Interval-timing scenario: a 1-second agent observed on a paused clock
/// for 2.5 intervals. The loop executes first and sleeps after, so ticks
/// land at t=0, t=1 and t=2 before the observation window closes.
#[tokio::test(start_paused = true)]
async fn test_interval_scenario_ticks_then_stop() {
    let dir = tempdir().unwrap();
    let executor = Arc::new(CountingExecutor {
        calls: AtomicU32::new(0),
    });
    let runner = AgentRunner::new(executor.clone(), runner_config(dir.path()));

    runner
        .register_agent_with_interval("demo", Duration::from_secs(1))
        .await;
    runner.start_agent("demo").await.unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let state = runner.agent_status("demo").await.unwrap();
    assert_eq!(state.run_count, 3);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 3);

    runner.stop_agent("demo").await.unwrap();
    let state = runner.agent_status("demo").await.unwrap();
    assert_eq!(state.status, AgentStatus::Stopped);
    assert_eq!(runner.active_task_count().await, 0);
}

/// Full daemon-shaped flow: specs saved to a registry file, loaded back,
/// executed via the command executor, observed via status and logs.
#[tokio::test]
async fn test_registry_to_runner_flow() {
    let dir = tempdir().unwrap();
    let registry_path = dir.path().join("agents.json");
    let log_dir = dir.path().join("logs");

    let specs = vec![AgentSpec {
        id: "echoer".to_string(),
        interval_secs: 1,
        command: "echo".to_string(),
        args: vec!["tick".to_string()],
        env_vars: HashMap::new(),
        working_dir: None,
        timeout_secs: Some(5),
    }];
    AgentRegistry::save_to_file(&specs, &registry_path).unwrap();

    let loaded = AgentRegistry::load_from_file(&registry_path).unwrap();
    assert_eq!(loaded.len(), 1);

    let executor = Arc::new(CommandExecutor::new(loaded.clone(), 30));
    let runner = AgentRunner::new(executor, runner_config(&log_dir));

    for spec in &loaded {
        runner
            .register_agent_with_interval(&spec.id, Duration::from_secs(spec.interval_secs))
            .await;
        runner.start_agent(&spec.id).await.unwrap();
    }

    // First tick runs immediately; give the subprocess a moment.
    tokio::time::sleep(Duration::from_millis(300)).await;
    runner.stop_agent("echoer").await.unwrap();

    let state = runner.agent_status("echoer").await.unwrap();
    assert_eq!(state.status, AgentStatus::Stopped);
    assert!(state.run_count >= 1);
    assert!(state.last_run.is_some());

    // The per-agent log file carries the lifecycle trail.
    let log_file = log_dir.join("echoer.log");
    let contents = std::fs::read_to_string(log_file).unwrap();
    assert!(contents.contains("registered"));
    assert!(contents.contains("started"));
    assert!(contents.contains("executing"));
    assert!(contents.contains("completed"));
    assert!(contents.contains("stopped"));

    // And the in-memory read API agrees.
    let logs = runner.get_logs(Some("echoer"), DEFAULT_LOG_LIMIT).await;
    assert!(logs.iter().any(|l| l.event == "completed"));
    assert!(logs
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
}

/// A crashing command parks its agent in `error` without touching others,
/// and the error is visible through status and logs.
#[tokio::test]
async fn test_failing_command_surfaces_through_reads() {
    let dir = tempdir().unwrap();
    let specs = vec![
        AgentSpec {
            id: "broken".to_string(),
            interval_secs: 1,
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "echo oops >&2; exit 1".to_string()],
            env_vars: HashMap::new(),
            working_dir: None,
            timeout_secs: Some(5),
        },
        AgentSpec {
            id: "healthy".to_string(),
            interval_secs: 1,
            command: "echo".to_string(),
            args: vec!["fine".to_string()],
            env_vars: HashMap::new(),
            working_dir: None,
            timeout_secs: Some(5),
        },
    ];

    let executor = Arc::new(CommandExecutor::new(specs.clone(), 30));
    let runner = AgentRunner::new(executor, runner_config(dir.path()));

    for spec in &specs {
        runner
            .register_agent_with_interval(&spec.id, Duration::from_secs(spec.interval_secs))
            .await;
        runner.start_agent(&spec.id).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(500)).await;

    let broken = runner.agent_status("broken").await.unwrap();
    assert_eq!(broken.status, AgentStatus::Error);
    assert_eq!(broken.error_count, 1);
    assert!(broken.last_error.as_deref().unwrap().contains("oops"));

    let healthy = runner.agent_status("healthy").await.unwrap();
    assert_eq!(healthy.status, AgentStatus::Running);
    assert!(healthy.run_count >= 1);

    let summary = runner.status_summary().await;
    assert_eq!(summary.total_agents, 2);
    assert_eq!(summary.errored, 1);

    let error_logs = runner.get_logs(Some("broken"), DEFAULT_LOG_LIMIT).await;
    assert!(error_logs.iter().any(|l| l.event == "failed"));

    runner.shutdown().await;
    assert_eq!(runner.active_task_count().await, 0);
    assert_eq!(
        runner.agent_status("healthy").await.unwrap().status,
        AgentStatus::Stopped
    );
    // Shutdown does not rewrite terminal error states.
    assert_eq!(
        runner.agent_status("broken").await.unwrap().status,
        AgentStatus::Error
    );
}
