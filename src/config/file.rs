// src/config/file.rs
// File-based configuration from ~/.fileflow/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default)]
pub struct FileFlowConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub command: CommandSection,
}

/// `[server]` section
#[derive(Debug, Deserialize, Default)]
pub struct ServerSection {
    /// Name advertised to MCP clients
    pub name: Option<String>,
}

/// `[command]` section, raw values validated by `EnvConfig`
#[derive(Debug, Deserialize, Default)]
pub struct CommandSection {
    pub confirm: Option<String>,
    pub elicitation_timeout_secs: Option<u64>,
    pub prompt_settle_ms: Option<u64>,
    pub echo: Option<String>,
}

impl FileFlowConfig {
    /// Load config from ~/.fileflow/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Directory holding config.toml and .env
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fileflow")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
