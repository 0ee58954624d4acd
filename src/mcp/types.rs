// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP types for tool and content handling.
//!
//! These types wrap the rmcp SDK model types to give the compose pipeline and
//! the CLI a plain serde interface. Conversions to and from rmcp live at the
//! bottom of this file.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, Implementation, InitializeResult, JsonObject, RawContent, Tool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision spoken by both ends.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Information about an MCP tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolInfo {
    /// Tool name.
    pub name: String,

    /// Tool description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for tool input.
    #[serde(default = "empty_object")]
    pub input_schema: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

/// Result of a tool call, in `tools/call` result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpToolResult {
    /// Result content (text, images, etc.).
    #[serde(default)]
    pub content: Vec<McpContent>,

    /// Whether there was an error.
    #[serde(default)]
    pub is_error: bool,
}

impl McpToolResult {
    /// Successful result with the given content.
    pub fn ok(content: Vec<McpContent>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Error result with the given content.
    pub fn failed(content: Vec<McpContent>) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// Create a successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self::ok(vec![McpContent::text(text)])
    }

    /// Whether the tool call was successful.
    pub fn success(&self) -> bool {
        !self.is_error
    }

    /// Get the text content as a single string.
    pub fn as_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                McpContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content types that can be returned by MCP tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum McpContent {
    /// Plain text content.
    Text {
        /// The text content.
        text: String,
    },

    /// Image content.
    Image {
        /// Base64-encoded image data.
        data: String,
        /// MIME type of the image.
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl McpContent {
    /// Create a text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Server information reported during initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,

    /// Server version.
    pub version: String,

    /// Protocol version supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
}

impl ServerInfo {
    /// Identity of this crate's server.
    pub fn this_server() -> Self {
        Self {
            name: "ai-extension".to_string(),
            version: crate::VERSION.to_string(),
            protocol_version: Some(PROTOCOL_VERSION.to_string()),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            version: "0.0.0".to_string(),
            protocol_version: None,
        }
    }
}

// ============================================================================
// rmcp Conversions
// ============================================================================

impl McpToolInfo {
    /// The rmcp tool definition advertised in `tools/list`.
    pub fn to_rmcp(&self) -> Tool {
        let schema = match &self.input_schema {
            Value::Object(map) => map.clone(),
            _ => JsonObject::new(),
        };
        Tool::new(
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            Arc::new(schema),
        )
    }
}

impl From<Tool> for McpToolInfo {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|d| d.to_string()),
            input_schema: Value::Object((*tool.input_schema).clone()),
        }
    }
}

impl From<McpContent> for Content {
    fn from(content: McpContent) -> Self {
        match content {
            McpContent::Text { text } => Content::text(text),
            McpContent::Image { data, mime_type } => Content::image(data, mime_type),
        }
    }
}

impl From<McpToolResult> for CallToolResult {
    fn from(result: McpToolResult) -> Self {
        let content = result.content.into_iter().map(Content::from).collect();
        if result.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl From<CallToolResult> for McpToolResult {
    fn from(result: CallToolResult) -> Self {
        let content = result
            .content
            .into_iter()
            .filter_map(|item| match item.raw {
                RawContent::Text(text) => Some(McpContent::Text { text: text.text }),
                RawContent::Image(image) => Some(McpContent::Image {
                    data: image.data,
                    mime_type: image.mime_type,
                }),
                _ => None,
            })
            .collect();

        Self {
            content,
            is_error: result.is_error.unwrap_or(false),
        }
    }
}

impl ServerInfo {
    /// Name and version as an rmcp implementation record.
    pub fn to_implementation(&self) -> Implementation {
        Implementation {
            name: self.name.clone(),
            version: self.version.clone(),
            title: None,
            icons: None,
            website_url: None,
        }
    }
}

impl From<&InitializeResult> for ServerInfo {
    fn from(init: &InitializeResult) -> Self {
        Self {
            name: init.server_info.name.clone(),
            version: init.server_info.version.clone(),
            protocol_version: Some(init.protocol_version.to_string()),
        }
    }
}
