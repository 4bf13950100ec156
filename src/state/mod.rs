// State management module
// Agent state records and the on-disk agent definition registry

pub mod agent;
pub mod registry;

pub use agent::{AgentId, AgentLog, AgentState, AgentStatus, LogSeverity, DEFAULT_INTERVAL};
pub use registry::{AgentRegistry, AgentSpec, RegistryError};
