// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Model Context Protocol (MCP) support.
//!
//! Both ends of the protocol sit on the rmcp SDK: [`McpServer`] exposes the
//! compose tool to an assistant, and [`McpClient`] drives a server (usually
//! this same binary) from the command line.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   rmcp session   ┌────────────────────────────┐
//! │ McpClient  │ ───────────────► │ McpServer (ServerHandler)  │
//! │ (timeouts) │ ◄─────────────── │  └─ ToolRegistry           │
//! └────────────┘  stdio / child   │      └─ ComposeTool        │
//!                                 │          └─ compose/render │
//!                                 └────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_extension::mcp::{ClientOptions, McpClient};
//!
//! let client = McpClient::spawn("ai-extension", &["serve".into()], &env, ClientOptions::default()).await?;
//! let result = client.call_tool("ai_extension_tool", json!({"message": "hi"})).await?;
//! client.shutdown().await?;
//! ```

pub mod client;
pub mod error;
pub mod server;
pub mod tool;
pub mod types;

pub use client::{ClientOptions, McpClient};
pub use error::McpError;
pub use server::{run_stdio_server, McpServer};
pub use tool::{ComposeTool, ToolHandler, ToolRegistry, DEFAULT_TOOL_NAME};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _ = std::any::type_name::<McpServer>();
        let _ = std::any::type_name::<McpError>();
        assert_eq!(DEFAULT_TOOL_NAME, "ai_extension_tool");
    }
}
