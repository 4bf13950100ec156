// Agent definition registry
// Loads and saves the JSON file describing which agents the daemon should
// schedule and what each one runs per tick.

use super::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error types for registry file operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File parsed but its contents are unusable
    #[error("Invalid registry data: {0}")]
    InvalidData(String),
}

/// Definition of one agent as stored in the registry file
///
/// The runner itself only needs the id and interval; the rest describes what
/// the command executor runs on each tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSpec {
    /// Identifier the agent is registered under
    pub id: AgentId,
    /// Seconds between ticks
    pub interval_secs: u64,
    /// Command executed on each tick
    pub command: String,
    /// Arguments passed to the command
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables set for the command
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
    /// Working directory for the command, if any
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Per-agent execution timeout override (seconds)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Serializable on-disk structure for the agent registry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryData {
    /// Version of the registry format (for future migration support)
    version: u32,
    /// Agent definitions keyed by id
    agents: Vec<AgentSpec>,
}

/// Registry file load/save operations
pub struct AgentRegistry;

impl AgentRegistry {
    /// Save agent definitions to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(
        specs: &[AgentSpec],
        path: P,
    ) -> Result<(), RegistryError> {
        let data = RegistryData {
            version: 1,
            agents: specs.to_vec(),
        };
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load agent definitions from a JSON file
    ///
    /// A missing file is not an error; it yields an empty registry so a fresh
    /// daemon can start with nothing scheduled.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<AgentSpec>, RegistryError> {
        if !path.as_ref().exists() {
            return Ok(Vec::new());
        }

        let json = fs::read_to_string(path.as_ref())?;
        let data: RegistryData = serde_json::from_str(&json)?;

        if data.version != 1 {
            return Err(RegistryError::InvalidData(format!(
                "Unsupported registry version: {}",
                data.version
            )));
        }

        let mut seen: HashMap<&str, ()> = HashMap::new();
        for spec in &data.agents {
            if spec.id.trim().is_empty() {
                return Err(RegistryError::InvalidData(
                    "Agent id cannot be empty".to_string(),
                ));
            }
            if seen.insert(spec.id.as_str(), ()).is_some() {
                return Err(RegistryError::InvalidData(format!(
                    "Duplicate agent id: {}",
                    spec.id
                )));
            }
        }

        Ok(data.agents)
    }

    /// Default path for the registry file, under the user's home directory
    pub fn default_path() -> std::path::PathBuf {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = std::path::PathBuf::from(home);
            path.push(".atom-agent-runner");
            path.push("agents.json");
            path
        } else {
            std::path::PathBuf::from("agents.json")
        }
    }
}
