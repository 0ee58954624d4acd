// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP error types.

use rmcp::service::ServiceError;
use thiserror::Error;

/// Errors that can occur during MCP operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool not found in the registry or on the server.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Failed to spawn the server process.
    #[error("Failed to start MCP server '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// The `initialize` exchange failed.
    #[error("MCP handshake failed: {0}")]
    Handshake(String),

    /// Request timed out.
    #[error("Request '{method}' timed out after {timeout_ms}ms")]
    Timeout { method: String, timeout_ms: u64 },

    /// The transport closed or broke mid-session.
    #[error("MCP transport error: {0}")]
    Transport(String),

    /// Error response from the peer, with its JSON-RPC code.
    #[error("Protocol error: code={code}, message={message}")]
    Protocol { code: i64, message: String },
}

impl McpError {
    /// Create a spawn failed error.
    pub fn spawn_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SpawnFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<ServiceError> for McpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::McpError(data) => Self::Protocol {
                code: i64::from(data.code.0),
                message: data.message.to_string(),
            },
            other => Self::Transport(other.to_string()),
        }
    }
}
