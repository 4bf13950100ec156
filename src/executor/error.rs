//! Execution-specific error types
//!
//! Errors that can occur during one tick of agent execution (process
//! spawning, timeouts, output handling).

use thiserror::Error;

/// Errors that can occur during agent execution
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Executor has no definition for the requested agent
    #[error("No definition for agent: {0}")]
    UnknownAgent(String),

    /// Process execution failed with non-zero exit code
    #[error("Process execution failed: {0}")]
    ProcessFailed(String),

    /// Command execution exceeded the timeout limit
    #[error("Command execution timed out after {0} seconds")]
    Timeout(u64),

    /// Failed to spawn the process (e.g., command not found, permission denied)
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// Process output could not be decoded as UTF-8
    #[error("Invalid output encoding: {0}")]
    InvalidEncoding(String),
}
