//! Core tool implementations for MCP.
//!
//! Filesystem tools are plain async functions; the command tool takes
//! `&impl ToolContext` for its decision source. All of them return
//! `Result<Json<…Output>, String>` and report expected failures through `status`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{FileFlowError, Result};
use crate::mcp::responses::{FsData, FsOutput, Json, Status};
use crate::runner::{Confirmer, DEFAULT_PROMPT_SETTLE, EchoMode};

/// Standard message when the directory argument is missing or not a directory.
pub const PATH_DOES_NOT_EXIST: &str = "Path does not exist";

/// Common context required by tools that run commands.
/// Implemented by FileFlowServer (MCP) and the CLI.
pub trait ToolContext: Send + Sync {
    /// Source of yes/no decisions for command prompts
    fn confirmer(&self) -> Arc<dyn Confirmer>;

    /// Where command output is mirrored while it streams
    fn echo_mode(&self) -> EchoMode {
        EchoMode::Log
    }

    /// Idle time before a partial output line is checked for a prompt
    fn prompt_settle(&self) -> Duration {
        DEFAULT_PROMPT_SETTLE
    }
}

/// Fail with `Path does not exist` unless `dir` is an existing directory
pub(crate) async fn require_dir(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(FileFlowError::InvalidPath(PATH_DOES_NOT_EXIST.to_string())),
    }
}

/// Reject names that would escape their parent directory
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || (cfg!(windows) && name.contains('\\'));
    if bad {
        return Err(FileFlowError::InvalidPath(format!("Invalid name: '{}'", name)));
    }
    Ok(())
}

pub(crate) fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Wrap an operation result into the filesystem tool output
pub(crate) fn fs_output(action: &str, result: Result<(String, FsData)>) -> Json<FsOutput> {
    match result {
        Ok((message, data)) => {
            tracing::debug!(action, "Filesystem tool succeeded");
            Json(FsOutput {
                action: action.into(),
                status: Status::Ok,
                message,
                data: Some(data),
            })
        }
        Err(e) => {
            tracing::debug!(action, error = %e, "Filesystem tool failed");
            Json(FsOutput {
                action: action.into(),
                status: e.status(),
                message: e.to_user_string(),
                data: None,
            })
        }
    }
}

// Shared test utilities (only compiled during tests)
#[cfg(test)]
pub(crate) mod test_utils;

// Sub-modules with tool implementations
pub mod command;
pub mod directories;
pub mod files;
pub mod metadata;
pub mod moves;
pub mod search;

// Re-export handler functions used by MCP router, CLI, and tests
pub use command::run_command;
pub use directories::{create_dir, delete_dir};
pub use files::{create_file, delete_file, write_file};
pub use metadata::meta_data;
pub use moves::{move_dir, move_file};
pub use search::search_file;
