// src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::setup_server_context;
use anyhow::Result;
use fileflow::mcp::FileFlowServer;
use fileflow::mcp::requests::{
    CreateDirRequest, CreateFileRequest, DeleteDirRequest, DeleteFileRequest, MetaDataRequest,
    MoveRequest, RunCommandRequest, SearchFileRequest, WriteFileRequest,
};
use fileflow::mcp::responses::Json;
use serde::Serialize;

/// Execute a tool directly from the command line
pub async fn run_tool(name: String, args: String) -> Result<()> {
    let server = setup_server_context()?;
    let output = dispatch(&server, &name, &args).await?;
    println!("{}", output);
    Ok(())
}

/// Run one tool by name and render its structured output as pretty JSON
pub async fn dispatch(server: &FileFlowServer, name: &str, args: &str) -> Result<String> {
    let res = match name {
        "run_command" => {
            let req: RunCommandRequest = serde_json::from_str(args)?;
            render(fileflow::tools::run_command(server, req.working_directory, req.command).await)
        }
        "create_file" => {
            let req: CreateFileRequest = serde_json::from_str(args)?;
            render(fileflow::tools::create_file(req.path, req.filename).await)
        }
        "write_file" => {
            let req: WriteFileRequest = serde_json::from_str(args)?;
            render(fileflow::tools::write_file(req.path, req.filename, req.content).await)
        }
        "delete_file" => {
            let req: DeleteFileRequest = serde_json::from_str(args)?;
            render(fileflow::tools::delete_file(req.path, req.filename).await)
        }
        "create_dir" => {
            let req: CreateDirRequest = serde_json::from_str(args)?;
            render(fileflow::tools::create_dir(req.path, req.name).await)
        }
        "delete_dir" => {
            let req: DeleteDirRequest = serde_json::from_str(args)?;
            render(fileflow::tools::delete_dir(req.path, req.name).await)
        }
        "move_file" => {
            let req: MoveRequest = serde_json::from_str(args)?;
            render(fileflow::tools::move_file(req.source, req.name, req.destination).await)
        }
        "move_dir" => {
            let req: MoveRequest = serde_json::from_str(args)?;
            render(fileflow::tools::move_dir(req.source, req.name, req.destination).await)
        }
        "search_file" => {
            let req: SearchFileRequest = serde_json::from_str(args)?;
            render(fileflow::tools::search_file(req.path, req.name).await)
        }
        "meta_data" => {
            let req: MetaDataRequest = serde_json::from_str(args)?;
            render(fileflow::tools::meta_data(req.path, req.name).await)
        }
        _ => Err(format!("Unknown tool: {}", name)),
    };

    res.map_err(anyhow::Error::msg)
}

fn render<T: Serialize>(result: Result<Json<T>, String>) -> Result<String, String> {
    let Json(output) = result?;
    serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
}

/// Tool names handled by `dispatch`; kept in sync with the MCP router
#[cfg(test)]
fn list_cli_tool_names() -> Vec<&'static str> {
    vec![
        "run_command",
        "create_file",
        "write_file",
        "delete_file",
        "create_dir",
        "delete_dir",
        "move_file",
        "move_dir",
        "search_file",
        "meta_data",
    ]
}
