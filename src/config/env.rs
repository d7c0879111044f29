// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::{Level, debug, info};

use super::file::FileFlowConfig;
use crate::runner::{DEFAULT_PROMPT_SETTLE, EchoMode};

/// Name advertised to MCP clients unless overridden
pub const DEFAULT_SERVER_NAME: &str = "FileFlow";

/// Timeout for elicitation requests (operator is reading a prompt, so be generous)
pub const DEFAULT_ELICITATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Where confirmation decisions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    /// Elicitation if the client supports it, else the terminal, else deny
    #[default]
    Auto,
    Elicit,
    Terminal,
    /// Approve every prompt without asking
    Approve,
    /// Decline every prompt without asking
    Deny,
}

impl ConfirmPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Elicit => "elicit",
            Self::Terminal => "terminal",
            Self::Approve => "approve",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for ConfirmPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "elicit" | "elicitation" => Ok(Self::Elicit),
            "terminal" | "tty" => Ok(Self::Terminal),
            "approve" | "yes" => Ok(Self::Approve),
            "deny" | "no" => Ok(Self::Deny),
            other => Err(format!(
                "unknown confirm policy '{}' (expected auto, elicit, terminal, approve, deny)",
                other
            )),
        }
    }
}

/// Command runner configuration
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Decision source for prompts (FILEFLOW_CONFIRM)
    pub confirm: ConfirmPolicy,
    /// Elicitation wait limit (FILEFLOW_ELICITATION_TIMEOUT_SECS)
    pub elicitation_timeout: Duration,
    /// Idle time before a partial line is checked for a prompt (FILEFLOW_PROMPT_SETTLE_MS)
    pub prompt_settle: Duration,
    /// Output mirror while serving (FILEFLOW_ECHO)
    pub echo: EchoMode,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            confirm: ConfirmPolicy::default(),
            elicitation_timeout: DEFAULT_ELICITATION_TIMEOUT,
            prompt_settle: DEFAULT_PROMPT_SETTLE,
            echo: EchoMode::default(),
        }
    }
}

/// Configuration validation result
#[derive(Debug)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ConfigValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Server name (FILEFLOW_SERVER_NAME, `[server] name`)
    pub server_name: String,
    /// Command runner settings
    pub command: CommandConfig,
    /// Log level override (FILEFLOW_LOG)
    pub log_level: Option<String>,
    /// Values that failed to parse and were replaced by defaults
    pub rejected: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            command: CommandConfig::default(),
            log_level: None,
            rejected: Vec::new(),
        }
    }
}

impl EnvConfig {
    /// Load all configuration (call once at startup). Env overrides file.
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_sources(&FileFlowConfig::load(), |name| std::env::var(name).ok())
    }

    /// Build from a parsed config file and an env lookup
    pub fn from_sources<F>(file: &FileFlowConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = lookup("FILEFLOW_SERVER_NAME").or_else(|| file.server.name.clone()) {
            config.server_name = name;
        }

        if let Some(raw) = lookup("FILEFLOW_CONFIRM").or_else(|| file.command.confirm.clone()) {
            match raw.parse() {
                Ok(policy) => config.command.confirm = policy,
                Err(e) => config.rejected.push(e),
            }
        }

        match lookup("FILEFLOW_ELICITATION_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => config.command.elicitation_timeout = Duration::from_secs(secs),
                Err(_) => config
                    .rejected
                    .push(format!("FILEFLOW_ELICITATION_TIMEOUT_SECS '{}' is not a number", raw)),
            },
            None => {
                if let Some(secs) = file.command.elicitation_timeout_secs {
                    config.command.elicitation_timeout = Duration::from_secs(secs);
                }
            }
        }

        match lookup("FILEFLOW_PROMPT_SETTLE_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => config.command.prompt_settle = Duration::from_millis(ms),
                Err(_) => config
                    .rejected
                    .push(format!("FILEFLOW_PROMPT_SETTLE_MS '{}' is not a number", raw)),
            },
            None => {
                if let Some(ms) = file.command.prompt_settle_ms {
                    config.command.prompt_settle = Duration::from_millis(ms);
                }
            }
        }

        if let Some(raw) = lookup("FILEFLOW_ECHO").or_else(|| file.command.echo.clone()) {
            match raw.parse() {
                Ok(echo) => config.command.echo = echo,
                Err(e) => config.rejected.push(e),
            }
        }

        config.log_level = lookup("FILEFLOW_LOG");

        debug!(
            server = %config.server_name,
            confirm = %config.command.confirm,
            echo = ?config.command.echo,
            "Configuration resolved"
        );
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        for rejected in &self.rejected {
            validation.add_warning(format!("{}; using default", rejected));
        }

        if self.server_name.trim().is_empty() {
            validation.add_error("Server name must not be empty");
        }

        if self.command.elicitation_timeout.is_zero() {
            validation.add_error(
                "Elicitation timeout is 0; every elicited prompt would be declined immediately",
            );
        }

        if self.command.prompt_settle.is_zero() {
            validation.add_error("Prompt settle interval must be greater than 0 ms");
        } else if self.command.prompt_settle > Duration::from_secs(5) {
            validation.add_warning(format!(
                "Prompt settle interval is {} ms; prompts without a trailing newline will be slow to surface",
                self.command.prompt_settle.as_millis()
            ));
        }

        if self.command.confirm == ConfirmPolicy::Approve {
            validation.add_warning(
                "FILEFLOW_CONFIRM=approve answers yes to every command prompt without asking",
            );
        }

        if let Some(ref level) = self.log_level
            && parse_log_level(level).is_none()
        {
            validation.add_warning(format!(
                "Unknown FILEFLOW_LOG '{}'. Valid options: error, warn, info, debug, trace",
                level
            ));
        }

        validation
    }

    /// Log level from FILEFLOW_LOG, if set and valid
    pub fn log_level_override() -> Option<Level> {
        std::env::var("FILEFLOW_LOG")
            .ok()
            .and_then(|v| parse_log_level(&v))
    }
}

/// Parse a tracing level name
pub fn parse_log_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
