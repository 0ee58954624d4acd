// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP server backed by the rmcp SDK.
//!
//! [`McpServer`] implements rmcp's `ServerHandler` on top of a
//! [`ToolRegistry`]. rmcp owns framing, the `initialize` handshake and method
//! routing; this module only answers `tools/list` and `tools/call`. Logs go to
//! stderr so stdout carries protocol traffic only.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
    ServerCapabilities,
};
use rmcp::service::RequestContext;
use rmcp::transport::IntoTransport;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{debug, info};

use super::error::McpError;
use super::tool::ToolRegistry;
use super::types::ServerInfo;

const INSTRUCTIONS: &str = "Call the compose tool to receive the user's next message, \
with its attached files, folders and images.";

/// Serves a tool registry over MCP.
#[derive(Clone)]
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, info: ServerInfo) -> Self {
        Self { registry, info }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Serve on any rmcp transport until the peer disconnects.
    pub async fn run<T, E, A>(self, transport: T) -> Result<(), McpError>
    where
        T: IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        info!(name = %self.info.name, tools = self.registry.len(), "MCP server running");

        let running = self
            .serve(transport)
            .await
            .map_err(|e| McpError::Handshake(e.to_string()))?;
        let reason = running
            .waiting()
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        info!(?reason, "MCP session ended");
        Ok(())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: self.info.to_implementation(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self.registry.list().iter().map(|t| t.to_rmcp()).collect();
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let name = request.name.as_ref();
        let arguments = request.arguments.map_or(Value::Null, Value::Object);
        debug!(tool = name, "tools/call");

        match self.registry.call(name, arguments).await {
            Ok(result) => Ok(result.into()),
            Err(e @ McpError::ToolNotFound(_)) => Err(ErrorData::invalid_params(e.to_string(), None)),
            Err(e) => Err(ErrorData::internal_error(e.to_string(), None)),
        }
    }
}

/// Serve on this process's stdin and stdout.
pub async fn run_stdio_server(server: McpServer) -> Result<(), McpError> {
    server.run(rmcp::transport::stdio()).await
}
