// src/config/mod.rs
// Configuration: environment variables layered over ~/.fileflow/config.toml

pub mod env;
pub mod file;

pub use env::{CommandConfig, ConfigValidation, ConfirmPolicy, EnvConfig};
pub use file::FileFlowConfig;
