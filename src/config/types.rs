// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of workspace and resolved configuration,
//! supporting JSON and YAML formats.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::mcp::{ClientOptions, DEFAULT_TOOL_NAME};
use crate::types::DEFAULT_LANGUAGE;

/// Default MCP server name reported in `serverInfo`.
pub const DEFAULT_SERVER_NAME: &str = "ai-extension";

/// Workspace configuration.
/// Can be defined in .ai-extension.json or .ai-extension/config.json in the project root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Reply language code appended to every payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Default for the continue-chat flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_chat: Option<bool>,

    /// Name the compose tool is published under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Name reported in `serverInfo`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_sec: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_timeout_sec: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_timeout_sec: Option<u64>,

    /// Classify attachments by probing the filesystem before falling back
    /// to name heuristics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_metadata: Option<bool>,

    /// Explicit MCP config file, checked before the well-known locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_config: Option<PathBuf>,
}

/// Fully resolved configuration after merging all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub language: String,
    pub continue_chat: bool,
    pub tool_name: String,
    pub server_name: String,
    pub request_timeout_sec: u64,
    pub startup_timeout_sec: u64,
    pub shutdown_timeout_sec: u64,
    pub use_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_config: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            continue_chat: false,
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            request_timeout_sec: 60,
            startup_timeout_sec: 10,
            shutdown_timeout_sec: 5,
            use_metadata: true,
            mcp_config: None,
        }
    }
}

impl ResolvedConfig {
    /// Client timeouts derived from this configuration.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout_sec))
            .with_startup_timeout(Duration::from_secs(self.startup_timeout_sec))
            .with_shutdown_timeout(Duration::from_secs(self.shutdown_timeout_sec))
    }
}
