//! Error types and error handling for the runner
//!
//! Configuration errors (unknown agent ids, unreadable registry files) are
//! raised to the caller; per-tick execution errors never surface here, they
//! are contained at the agent boundary and recorded on the agent's state.

use thiserror::Error;

/// Runner-level error types
///
/// Registry-file errors stay with [`crate::state::RegistryError`]; the
/// daemon surfaces them directly at startup rather than through the runner.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Agent with the given ID was never registered
    #[error("Agent not found: {0}")]
    AgentNotFound(String),
}
