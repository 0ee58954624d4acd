// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool handlers served over MCP.
//!
//! - [`ToolHandler`] trait that every served tool implements
//! - [`ToolRegistry`] for listing and dispatching tool calls
//! - [`ComposeTool`], the compose pipeline exposed as a tool

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

use super::error::McpError;
use super::types::{McpContent, McpToolInfo, McpToolResult};
use crate::compose::{compose, render, wrap_error};
use crate::error::ComposeError;
use crate::types::{ComposeInput, DEFAULT_LANGUAGE};

/// Default name of the compose tool.
pub const DEFAULT_TOOL_NAME: &str = "ai_extension_tool";

/// Trait that all served tools implement.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and input schema.
    fn definition(&self) -> McpToolInfo;

    /// Run the tool. Failures are reported inside the result, never as `Err`.
    async fn call(&self, arguments: Value) -> McpToolResult;
}

/// Registry of served tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the compose tool.
    pub fn with_compose_tool(tool_name: impl Into<String>, default_language: impl Into<String>) -> Self {
        let mut registry = Self::new();
        registry.register(ComposeTool::new(tool_name, default_language));
        registry
    }

    /// Register a tool, replacing any tool of the same name.
    pub fn register<T: ToolHandler + 'static>(&mut self, tool: T) {
        let name = tool.definition().name;
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of all tools, sorted by name.
    pub fn list(&self) -> Vec<McpToolInfo> {
        let mut tools: Vec<McpToolInfo> = self.tools.values().map(|t| t.definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call by tool name.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<McpToolResult, McpError> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        let result = tool
            .call(arguments)
            .instrument(info_span!("tool_call", tool = %name))
            .await;
        debug!(is_error = result.is_error, items = result.content.len(), "Tool finished");
        Ok(result)
    }
}

/// The compose pipeline as an MCP tool.
///
/// Arguments are a [`ComposeInput`] record; the result is the rendered
/// envelope, or a single `Error: ...` item with `isError` set.
pub struct ComposeTool {
    name: String,
    default_language: String,
}

impl ComposeTool {
    pub fn new(name: impl Into<String>, default_language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_language: default_language.into(),
        }
    }

    fn run(&self, arguments: Value) -> Result<Vec<McpContent>, ComposeError> {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let input: ComposeInput = serde_json::from_value(arguments)
            .map_err(|e| ComposeError::InvalidInput(e.to_string()))?;

        let request = input.into_request(&self.default_language);
        if request.is_blank() {
            return Err(ComposeError::validation("Response data is empty"));
        }

        render(&compose(request))
    }
}

impl Default for ComposeTool {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL_NAME, DEFAULT_LANGUAGE)
    }
}

#[async_trait]
impl ToolHandler for ComposeTool {
    fn definition(&self) -> McpToolInfo {
        McpToolInfo {
            name: self.name.clone(),
            description: Some(TOOL_DESCRIPTION.to_string()),
            input_schema: compose_input_schema(),
        }
    }

    async fn call(&self, arguments: Value) -> McpToolResult {
        match self.run(arguments) {
            Ok(content) => McpToolResult::ok(content),
            Err(e) => {
                warn!(error = %e, "Compose failed");
                McpToolResult::failed(wrap_error(e))
            }
        }
    }
}

const TOOL_DESCRIPTION: &str = "Forward a message composed by the user, with attached files, \
folders and images, to the assistant. The result is the user's message followed by \
<AI_EXTENSION_ATTACHED_FILES> (FOLDERS:/FILES:/ERRORS: sections), \
<AI_EXTENSION_WORKSPACE>, <AI_EXTENSION_CONTINUE_CHAT> and <AI_EXTENSION_LANGUAGE> tags. \
When CONTINUE_CHAT is true, call this tool again after answering.";

fn compose_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string",
                "description": "Free-text message typed by the user"
            },
            "attachedFiles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "fullPath": { "type": "string" },
                        "relativePath": { "type": "string" },
                        "type": { "type": "string", "enum": ["file", "folder"] },
                        "name": { "type": "string" }
                    }
                }
            },
            "attachedImages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "base64Data": { "type": "string" },
                        "mediaType": { "type": "string" }
                    },
                    "required": ["path"]
                }
            },
            "workspace": {
                "type": "string",
                "description": "Workspace name or full workspace path"
            },
            "continueChat": { "type": "boolean", "default": false },
            "language": { "type": "string", "default": DEFAULT_LANGUAGE }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compose_tool_success() {
        let tool = ComposeTool::default();
        let result = tool
            .call(json!({
                "message": "hello",
                "attachedFiles": [
                    {"fullPath": "/w/demo/src", "relativePath": "src", "type": "folder", "name": "src"}
                ],
                "workspace": "/w/demo",
                "continueChat": true
            }))
            .await;

        assert!(result.success());
        let text = result.as_text();
        assert!(text.starts_with("hello\n\n<AI_EXTENSION_ATTACHED_FILES>\nFOLDERS:\n- src\n"));
        assert!(text.contains("<AI_EXTENSION_WORKSPACE>demo</AI_EXTENSION_WORKSPACE>"));
        assert!(text.contains("<AI_EXTENSION_CONTINUE_CHAT>true</AI_EXTENSION_CONTINUE_CHAT>"));
    }

    #[tokio::test]
    async fn test_compose_tool_blank_request() {
        let tool = ComposeTool::default();
        let result = tool.call(Value::Null).await;
        assert!(result.is_error);
        assert_eq!(result.as_text(), "Error: Response data is empty");
    }

    #[tokio::test]
    async fn test_compose_tool_bad_arguments() {
        let tool = ComposeTool::default();
        let result = tool.call(json!({"message": 42})).await;
        assert!(result.is_error);
        assert!(result.as_text().starts_with("Error: Invalid input:"));
    }

    #[tokio::test]
    async fn test_compose_tool_uses_default_language() {
        let tool = ComposeTool::new("compose", "vi");
        let result = tool.call(json!({"message": "xin chao"})).await;
        assert!(result
            .as_text()
            .ends_with("<AI_EXTENSION_LANGUAGE>vi</AI_EXTENSION_LANGUAGE>"));
    }

    #[tokio::test]
    async fn test_compose_tool_reads_image_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let tool = ComposeTool::default();
        let result = tool
            .call(json!({
                "message": "what is this",
                "attachedImages": [{"path": path.to_string_lossy()}]
            }))
            .await;

        assert!(result.success());
        assert_eq!(result.content.len(), 2);
        assert!(!result.as_text().contains("ERRORS:"));
        assert_eq!(
            result.content[1],
            McpContent::Image {
                data: "R0lGODlh".to_string(),
                mime_type: "image/gif".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_registry_dispatch() {
        let registry = ToolRegistry::with_compose_tool("compose", "en");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].name, "compose");

        let result = registry.call("compose", json!({"message": "hi"})).await.unwrap();
        assert!(result.success());

        let missing = registry.call("nope", json!({})).await;
        assert!(matches!(missing, Err(McpError::ToolNotFound(_))));
    }
}
