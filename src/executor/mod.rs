//! Agent execution module
//!
//! The runner never executes work itself; it awaits an injected
//! [`AgentExecutor`] once per tick. `CommandExecutor` is the concrete
//! implementation used by the daemon binary; library users supply their own.

pub mod command;
pub mod error;

pub use command::CommandExecutor;
pub use error::ExecutionError;

use async_trait::async_trait;

/// Callback contract invoked once per tick of a running agent
///
/// The executor owns the agent definitions; the runner passes only the id.
/// An `Err` return is recorded as a failed tick and parks the agent in the
/// terminal `Error` state.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Execute one tick of the named agent, returning its textual output
    async fn execute(&self, agent_id: &str) -> Result<String, ExecutionError>;
}
