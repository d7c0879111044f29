//! Structured output types for MCP tools.
//!
//! Each tool returns a wrapper struct with `action`, `status`, `message`, and optional
//! typed `data`. Using `Json<T>` return types, rmcp auto-infers `outputSchema` for each
//! tool. The root type is always an object (MCP requirement).

pub use rmcp::handler::server::wrapper::Json;

use schemars::JsonSchema;
use serde::Serialize;

use crate::runner::PromptRecord;

pub use crate::error::Status;

// ============================================================================
// Filesystem
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct FsOutput {
    pub action: String,
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FsData>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum FsData {
    Written(WrittenData),
    Moved(MovedData),
    Search(SearchData),
    Metadata(MetadataData),
    Path(PathData),
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PathData {
    pub path: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct WrittenData {
    pub path: String,
    pub bytes_written: u64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MovedData {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SearchData {
    /// First match in walk order
    pub path: String,
    pub matches: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MetadataData {
    pub path: String,
    pub kind: String,
    pub size: u64,
    pub readonly: bool,
    /// Local time `%Y-%m-%d %H:%M:%S`, `None` when the platform does not record it
    pub created: Option<String>,
    pub modified: Option<String>,
    pub accessed: Option<String>,
}

// ============================================================================
// Command
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct CommandOutput {
    pub action: String,
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CommandData {
    pub working_directory: String,
    pub command: String,
    /// Combined stdout and stderr in emission order
    pub output: String,
    /// `None` when aborted or killed by a signal
    pub exit_code: Option<i32>,
    pub aborted: bool,
    pub prompts: Vec<PromptRecord>,
}

// ============================================================================
// Tests
// ============================================================================
