//! Log sink for agent lifecycle events
//!
//! Every event is kept in a bounded in-memory ring and appended best-effort
//! to a per-agent text file at `<log_dir>/<agent_id>.log`. A failed file
//! write degrades to in-memory-only; it never fails the caller's tick.

use crate::state::{AgentLog, LogSeverity};
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;

/// In-memory ring plus per-agent append-only files
pub struct LogSink {
    log_dir: PathBuf,
    max_entries: usize,
    entries: RwLock<VecDeque<AgentLog>>,
}

impl LogSink {
    /// Create a sink writing files under `log_dir`, keeping at most
    /// `max_entries` records in memory
    pub fn new(log_dir: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            log_dir: log_dir.into(),
            max_entries: max_entries.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Path of the log file for one agent
    pub fn file_path(&self, agent_id: &str) -> PathBuf {
        self.log_dir.join(format!("{}.log", agent_id))
    }

    /// Record one event: append to the file (best effort) and to the ring
    ///
    /// A failed file write degrades to memory only and leaves a `Warning`
    /// entry in the ring alongside the original record.
    pub async fn record(&self, log: AgentLog) {
        let write_error = append_line(&self.file_path(&log.agent_id), &self.log_dir, &log).err();

        let mut entries = self.entries.write().await;
        if let Some(e) = write_error {
            warn!(
                agent_id = %log.agent_id,
                error = %e,
                "Log file write failed; keeping entry in memory only"
            );
            push_bounded(
                &mut entries,
                self.max_entries,
                AgentLog::now(
                    &log.agent_id,
                    LogSeverity::Warning,
                    "log_write_failed",
                    e.to_string(),
                ),
            );
        }
        push_bounded(&mut entries, self.max_entries, log);
    }

    /// Most recent `limit` entries in chronological order, optionally
    /// filtered to one agent
    pub async fn recent(&self, agent_id: Option<&str>, limit: usize) -> Vec<AgentLog> {
        let entries = self.entries.read().await;
        let mut selected: Vec<AgentLog> = entries
            .iter()
            .rev()
            .filter(|log| agent_id.map_or(true, |id| log.agent_id == id))
            .take(limit)
            .cloned()
            .collect();
        selected.reverse();
        selected
    }
}

fn push_bounded(entries: &mut VecDeque<AgentLog>, max_entries: usize, log: AgentLog) {
    if entries.len() == max_entries {
        entries.pop_front();
    }
    entries.push_back(log);
}

// File handle is opened and closed per call; all writes come from the
// runner's own tasks, so there is no concurrent-writer protection needed.
fn append_line(path: &Path, log_dir: &Path, log: &AgentLog) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", log.format_line())
}
