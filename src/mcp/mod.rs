// src/mcp/mod.rs
// MCP Server implementation

pub mod elicitation;
mod handler;
pub mod requests;
pub mod responses;

use std::sync::Arc;
use std::time::Duration;

use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::{tool, tool_router};
use tokio::sync::RwLock;

use crate::config::EnvConfig;
use crate::runner::{Confirmer, EchoMode};
use crate::tools;
use crate::tools::core::ToolContext;
use elicitation::{ElicitationClient, PeerSlot, confirmer_for};
use requests::{
    CreateDirRequest, CreateFileRequest, DeleteDirRequest, DeleteFileRequest, MetaDataRequest,
    MoveRequest, RunCommandRequest, SearchFileRequest, WriteFileRequest,
};
use responses::{CommandOutput, FsOutput, Json};

/// MCP Server state
#[derive(Clone)]
pub struct FileFlowServer {
    pub config: Arc<EnvConfig>,
    /// MCP client peer, captured on first tool call (for elicitation)
    pub peer: PeerSlot,
    confirmer: Arc<dyn Confirmer>,
    tool_router: ToolRouter<Self>,
}

impl FileFlowServer {
    /// Create a server whose prompt decisions follow the configured policy
    pub fn new(config: EnvConfig) -> Self {
        let peer: PeerSlot = Arc::new(RwLock::new(None));
        let client = ElicitationClient::new(peer.clone())
            .with_timeout(config.command.elicitation_timeout);
        let confirmer = confirmer_for(config.command.confirm, client);
        Self::assemble(config, peer, confirmer)
    }

    /// Create a server with an explicit decision source
    pub fn with_confirmer(config: EnvConfig, confirmer: Arc<dyn Confirmer>) -> Self {
        Self::assemble(config, Arc::new(RwLock::new(None)), confirmer)
    }

    fn assemble(config: EnvConfig, peer: PeerSlot, confirmer: Arc<dyn Confirmer>) -> Self {
        tracing::debug!(confirmer = confirmer.name(), "FileFlow server created");
        Self {
            config: Arc::new(config),
            peer,
            confirmer,
            tool_router: Self::tool_router(),
        }
    }

    /// Names of every registered tool
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

impl ToolContext for FileFlowServer {
    fn confirmer(&self) -> Arc<dyn Confirmer> {
        self.confirmer.clone()
    }

    fn echo_mode(&self) -> EchoMode {
        self.config.command.echo
    }

    fn prompt_settle(&self) -> Duration {
        self.config.command.prompt_settle
    }
}

#[tool_router]
impl FileFlowServer {
    #[tool(
        description = "Run a shell command in a directory and return its combined output. When the command asks a yes/no question (\"ok to proceed\", \"do you want to continue\", \"(y/n)\", \"[y/n]\") the operator is asked to confirm; a decline kills the command and the output ends with \"Command aborted by user.\""
    )]
    async fn run_command(
        &self,
        Parameters(req): Parameters<RunCommandRequest>,
    ) -> Result<Json<CommandOutput>, String> {
        tools::run_command(self, req.working_directory, req.command).await
    }

    #[tool(
        description = "Create an empty file. Refuses when an entry in the directory has the same name or a name containing it."
    )]
    async fn create_file(
        &self,
        Parameters(req): Parameters<CreateFileRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::create_file(req.path, req.filename).await
    }

    #[tool(description = "Replace the contents of an existing file. Does not create new files.")]
    async fn write_file(
        &self,
        Parameters(req): Parameters<WriteFileRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::write_file(req.path, req.filename, req.content).await
    }

    #[tool(description = "Delete a file.")]
    async fn delete_file(
        &self,
        Parameters(req): Parameters<DeleteFileRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::delete_file(req.path, req.filename).await
    }

    #[tool(description = "Create a directory inside an existing directory.")]
    async fn create_dir(
        &self,
        Parameters(req): Parameters<CreateDirRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::create_dir(req.path, req.name).await
    }

    #[tool(description = "Delete a directory and everything inside it.")]
    async fn delete_dir(
        &self,
        Parameters(req): Parameters<DeleteDirRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::delete_dir(req.path, req.name).await
    }

    #[tool(
        description = "Move a file. Into an existing directory it keeps its name; otherwise destination is the new path. Never overwrites."
    )]
    async fn move_file(
        &self,
        Parameters(req): Parameters<MoveRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::move_file(req.source, req.name, req.destination).await
    }

    #[tool(
        description = "Move a directory with its contents. Into an existing directory it keeps its name; otherwise destination is the new path. Never overwrites."
    )]
    async fn move_dir(
        &self,
        Parameters(req): Parameters<MoveRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::move_dir(req.source, req.name, req.destination).await
    }

    #[tool(description = "Search a directory tree for an entry with exactly this name. Returns the first match.")]
    async fn search_file(
        &self,
        Parameters(req): Parameters<SearchFileRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::search_file(req.path, req.name).await
    }

    #[tool(description = "Get size and created/modified/accessed times of a file or directory.")]
    async fn meta_data(
        &self,
        Parameters(req): Parameters<MetaDataRequest>,
    ) -> Result<Json<FsOutput>, String> {
        tools::meta_data(req.path, req.name).await
    }
}
