//! Background agent runner
//!
//! Scheduling service and its log sink. See [`service::AgentRunner`].

pub mod service;
pub mod sink;

pub use service::{AgentRunner, RunnerSummary, DEFAULT_LOG_LIMIT};
pub use sink::LogSink;
