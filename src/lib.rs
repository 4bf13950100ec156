//! ATOM Agent Runner Library
//!
//! Schedules named periodic agents on independent tokio tasks, with crash
//! isolation per agent, per-agent append-only log files, and an in-process
//! status/log read API. The daemon binary is in `src/main.rs`.

pub mod config;
pub mod error;
pub mod executor;
pub mod runner;
/// Agent state records and the on-disk agent definition registry
pub mod state;
