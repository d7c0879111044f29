// src/cli/serve.rs
// MCP server initialization and main loop

use anyhow::Result;
use fileflow::config::EnvConfig;
use fileflow::mcp::FileFlowServer;
use tracing::{info, warn};

/// Load configuration, log validation problems, and build the server
pub fn setup_server_context() -> Result<FileFlowServer> {
    let env_config = EnvConfig::load();

    let validation = env_config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("Invalid configuration:\n{}", validation.report());
    }

    info!(
        server = %env_config.server_name,
        confirm = %env_config.command.confirm,
        "Configuration loaded"
    );
    Ok(FileFlowServer::new(env_config))
}

/// Run the MCP server over stdio until the client disconnects
pub async fn run_mcp_server() -> Result<()> {
    let server = setup_server_context()?;

    // Run with stdio transport
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}
