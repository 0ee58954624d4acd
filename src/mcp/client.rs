// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP client implementation.
//!
//! [`McpClient`] drives a server through the rmcp SDK, either as a spawned
//! subprocess ([`McpClient::spawn`]) or over any rmcp transport
//! ([`McpClient::connect`]). The handshake and every request are bounded by
//! the timeouts in [`ClientOptions`].

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use rmcp::model::CallToolRequestParam;
use rmcp::service::{RunningService, ServiceError};
use rmcp::transport::{ConfigureCommandExt, IntoTransport, TokioChildProcess};
use rmcp::{RoleClient, ServiceExt};
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::error::McpError;
use super::types::{McpToolInfo, McpToolResult, ServerInfo};

/// Timeouts used by a client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout for each request after the handshake.
    pub request_timeout: Duration,

    /// Timeout for the `initialize` handshake.
    pub startup_timeout: Duration,

    /// How long to wait for the session to wind down on shutdown.
    pub shutdown_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            startup_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientOptions {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Client for a single, initialized MCP session.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,

    options: ClientOptions,

    /// Server info from the handshake.
    server_info: ServerInfo,

    /// Tools seen by the last `list_tools`.
    tools: Vec<McpToolInfo>,
}

impl McpClient {
    /// Spawn `command` and run the handshake over its stdin and stdout.
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
        options: ClientOptions,
    ) -> Result<Self, McpError> {
        let transport = TokioChildProcess::new(Command::new(command).configure(|cmd| {
            cmd.args(args).envs(env);
        }))
        .map_err(|e| McpError::spawn_failed(command, e.to_string()))?;

        info!(command, "Spawned MCP server");
        Self::connect(transport, options).await
    }

    /// Run the handshake over an existing transport.
    pub async fn connect<T, E, A>(transport: T, options: ClientOptions) -> Result<Self, McpError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let startup = options.startup_timeout;
        let service = tokio::time::timeout(startup, ().serve(transport))
            .await
            .map_err(|_| timeout_error("initialize", startup))?
            .map_err(|e| McpError::Handshake(e.to_string()))?;

        let server_info = service.peer_info().map(ServerInfo::from).unwrap_or_default();
        info!(server = %server_info.name, version = %server_info.version, "MCP session ready");

        Ok(Self {
            service,
            options,
            server_info,
            tools: Vec::new(),
        })
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn tools(&self) -> &[McpToolInfo] {
        &self.tools
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fetch the server's tool list.
    pub async fn list_tools(&mut self) -> Result<Vec<McpToolInfo>, McpError> {
        let result = bounded(
            "tools/list",
            self.options.request_timeout,
            self.service.list_tools(Default::default()),
        )
        .await?;

        self.tools = result.tools.into_iter().map(McpToolInfo::from).collect();
        debug!(count = self.tools.len(), "Fetched tools");
        Ok(self.tools.clone())
    }

    /// Call a tool by name with the default request timeout.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult, McpError> {
        self.call_tool_with_timeout(name, arguments, self.options.request_timeout)
            .await
    }

    /// Call a tool by name, waiting at most `timeout` for the result.
    pub async fn call_tool_with_timeout(
        &self,
        name: &str,
        arguments: Value,
        timeout: Duration,
    ) -> Result<McpToolResult, McpError> {
        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = bounded("tools/call", timeout, self.service.call_tool(params)).await?;
        Ok(result.into())
    }

    /// End the session. A spawned server is reaped when its transport drops.
    pub async fn shutdown(self) -> Result<(), McpError> {
        match tokio::time::timeout(self.options.shutdown_timeout, self.service.cancel()).await {
            Ok(Ok(reason)) => debug!(?reason, "MCP session closed"),
            Ok(Err(e)) => return Err(McpError::Transport(e.to_string())),
            Err(_) => warn!("MCP session did not close in time"),
        }
        Ok(())
    }
}

async fn bounded<T, F>(method: &str, timeout: Duration, request: F) -> Result<T, McpError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(McpError::from),
        Err(_) => Err(timeout_error(method, timeout)),
    }
}

fn timeout_error(method: &str, timeout: Duration) -> McpError {
    McpError::Timeout {
        method: method.to_string(),
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}
