// src/error.rs
// Standardized error types for FileFlow

use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

use crate::runner::RunnerError;

/// Outcome of a tool call: `ok` or the category of failure.
///
/// Serialized into tool outputs so callers can branch on a value instead of
/// matching message prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    InvalidPath,
    NameConflict,
    NotFound,
    PermissionDenied,
    OperationFailed,
    UserAborted,
}

/// Main error type for the FileFlow library
#[derive(Error, Debug)]
pub enum FileFlowError {
    #[error("{0}")]
    InvalidPath(String),

    #[error("{0}")]
    NameConflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Failed {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Convenience type alias for Result using FileFlowError
pub type Result<T> = std::result::Result<T, FileFlowError>;

impl FileFlowError {
    /// Status reported at the tool boundary
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidPath(_) => Status::InvalidPath,
            Self::NameConflict(_) => Status::NameConflict,
            Self::NotFound(_) => Status::NotFound,
            Self::Failed { source, .. } => io_status(source),
            Self::Runner(RunnerError::MissingDirectory(_)) => Status::InvalidPath,
            Self::Runner(_) => Status::OperationFailed,
        }
    }

    /// Convert to user-facing string for MCP tool boundaries
    pub fn to_user_string(&self) -> String {
        self.to_string()
    }
}

/// Map an I/O failure onto the tool taxonomy.
pub fn io_status(err: &std::io::Error) -> Status {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => Status::PermissionDenied,
        std::io::ErrorKind::NotFound => Status::NotFound,
        std::io::ErrorKind::AlreadyExists => Status::NameConflict,
        _ => Status::OperationFailed,
    }
}

/// Attach a user-facing context to I/O failures
pub trait IoContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> IoContext<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| FileFlowError::Failed { context, source })
    }
}

impl From<FileFlowError> for String {
    fn from(err: FileFlowError) -> Self {
        err.to_string()
    }
}
