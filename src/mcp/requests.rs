// src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RunCommandRequest {
    #[schemars(description = "Directory the command runs in. Must already exist.")]
    pub working_directory: String,
    #[schemars(
        description = "Shell command line (sh -c on Unix, cmd /C on Windows). Yes/no prompts are confirmed with the operator."
    )]
    pub command: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateFileRequest {
    #[schemars(description = "Existing directory to create the file in")]
    pub path: String,
    #[schemars(description = "Name of the new file")]
    pub filename: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WriteFileRequest {
    #[schemars(description = "Directory containing the file")]
    pub path: String,
    #[schemars(description = "Name of an existing file")]
    pub filename: String,
    #[schemars(description = "Content that replaces the whole file")]
    pub content: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFileRequest {
    #[schemars(description = "Directory containing the file")]
    pub path: String,
    #[schemars(description = "Name of the file to delete")]
    pub filename: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateDirRequest {
    #[schemars(description = "Existing parent directory")]
    pub path: String,
    #[schemars(description = "Name of the new directory")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteDirRequest {
    #[schemars(description = "Parent directory")]
    pub path: String,
    #[schemars(description = "Name of the directory to delete, with everything inside it")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MoveRequest {
    #[schemars(description = "Entry to move, or its parent directory when `name` is given")]
    pub source: String,
    #[schemars(description = "Entry name inside `source`")]
    pub name: Option<String>,
    #[schemars(
        description = "Existing directory to move into (keeps the name), or the full target path"
    )]
    pub destination: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFileRequest {
    #[schemars(description = "Directory to search recursively")]
    pub path: String,
    #[schemars(description = "Exact file name to look for")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MetaDataRequest {
    #[schemars(description = "Directory containing the entry")]
    pub path: String,
    #[schemars(description = "Name of the file or directory")]
    pub name: String,
}
