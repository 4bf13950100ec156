//! Command executor implementation
//!
//! Executes one tick of an agent by spawning the process configured in its
//! registry definition and capturing its output.

use crate::executor::error::ExecutionError;
use crate::executor::AgentExecutor;
use crate::state::{AgentId, AgentSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Executor that runs a configured command per agent tick
pub struct CommandExecutor {
    /// Agent definitions keyed by id
    specs: HashMap<AgentId, AgentSpec>,
    /// Timeout applied when a spec carries no override
    default_timeout: Duration,
}

impl CommandExecutor {
    /// Create an executor from agent definitions and a default timeout
    pub fn new(specs: impl IntoIterator<Item = AgentSpec>, default_timeout_secs: u64) -> Self {
        Self {
            specs: specs.into_iter().map(|s| (s.id.clone(), s)).collect(),
            default_timeout: Duration::from_secs(default_timeout_secs),
        }
    }

    fn timeout_for(&self, spec: &AgentSpec) -> Duration {
        spec.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
    }
}

#[async_trait]
impl AgentExecutor for CommandExecutor {
    async fn execute(&self, agent_id: &str) -> Result<String, ExecutionError> {
        let spec = self
            .specs
            .get(agent_id)
            .ok_or_else(|| ExecutionError::UnknownAgent(agent_id.to_string()))?;

        info!(
            agent_id = %agent_id,
            command = %spec.command,
            "Executing agent tick"
        );

        let mut cmd = Command::new(&spec.command);
        cmd.args(&spec.args);

        for (key, value) in &spec.env_vars {
            cmd.env(key, value);
        }

        if let Some(work_dir) = &spec.working_dir {
            cmd.current_dir(work_dir);
        }

        debug!(
            command = %spec.command,
            args = ?spec.args,
            "Spawning process"
        );

        let tick_timeout = self.timeout_for(spec);
        match timeout(tick_timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    let stdout = String::from_utf8(output.stdout).map_err(|e| {
                        ExecutionError::InvalidEncoding(format!("Failed to decode stdout: {}", e))
                    })?;

                    info!(
                        agent_id = %agent_id,
                        output_len = stdout.len(),
                        "Tick executed successfully"
                    );

                    Ok(stdout)
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let exit_code = output.status.code().unwrap_or(-1);

                    error!(
                        agent_id = %agent_id,
                        exit_code = exit_code,
                        stderr = %stderr,
                        "Process execution failed"
                    );

                    Err(ExecutionError::ProcessFailed(format!(
                        "Process exited with code {}: {}",
                        exit_code, stderr
                    )))
                }
            }
            Ok(Err(e)) => {
                error!(
                    agent_id = %agent_id,
                    error = %e,
                    "Failed to spawn or execute process"
                );
                Err(ExecutionError::SpawnFailed(e))
            }
            Err(_) => {
                error!(
                    agent_id = %agent_id,
                    timeout_secs = tick_timeout.as_secs(),
                    "Process execution timed out"
                );
                Err(ExecutionError::Timeout(tick_timeout.as_secs()))
            }
        }
    }
}
