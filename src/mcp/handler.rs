// src/mcp/handler.rs
// MCP ServerHandler implementation: protocol lifecycle methods

use super::FileFlowServer;

use std::time::Instant;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::tool::ToolCallContext,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};

impl ServerHandler for FileFlowServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: self.config.server_name.clone(),
                title: Some("FileFlow - filesystem and interactive shell tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FileFlow exposes filesystem operations and an interactive command runner. \
                 Commands that ask yes/no questions are confirmed with the operator before continuing."
                    .into(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            // Capture the peer so command prompts can be elicited
            {
                let mut peer_guard = self.peer.write().await;
                if peer_guard.is_none() {
                    *peer_guard = Some(context.peer.clone());
                }
            }

            let tool_name = request.name.to_string();
            let start = Instant::now();

            let tool_context = ToolCallContext::new(self, request, context);
            let result = self.tool_router.call(tool_context).await;

            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => tracing::info!(
                    tool = %tool_name,
                    duration_ms,
                    is_error = r.is_error.unwrap_or(false),
                    "Tool call finished"
                ),
                Err(e) => tracing::warn!(
                    tool = %tool_name,
                    duration_ms,
                    error = %e.message,
                    "Tool call rejected"
                ),
            }

            result
        }
    }
}
