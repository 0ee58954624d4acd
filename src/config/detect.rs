// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MCP server entry detection.
//!
//! Looks for a file with an `mcpServers` object in, by priority:
//! 1. an explicitly configured path
//! 2. ~/.ai-extension/mcp_config.json
//! 3. ~/.cursor/mcp.json
//! 4. ~/.vscode/mcp.json
//!
//! and falls back to a built-in entry that runs `ai-extension serve`.
//! Detection only reads files; it never writes IDE configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Directory under the home directory holding our own MCP config.
pub const CONFIG_DIR: &str = ".ai-extension";

/// File name of our own MCP config inside [`CONFIG_DIR`].
pub const MCP_CONFIG_FILE: &str = "mcp_config.json";

/// Server names accepted for this tool, tried in order.
pub const SERVER_NAME_CANDIDATES: &[&str] = &["ai-extension", "ai_extension", "aiextension", "AI extension"];

/// Where a detected configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum McpConfigSource {
    Explicit,
    Local,
    Cursor,
    Vscode,
    Default,
}

impl McpConfigSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explicit => "Explicit path",
            Self::Local => "Local AI extension",
            Self::Cursor => "Cursor IDE",
            Self::Vscode => "VS Code",
            Self::Default => "Built-in default",
        }
    }
}

impl std::fmt::Display for McpConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of an `mcpServers` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerEntry {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: HashMap<String, String>,

    #[serde(default)]
    pub disabled: bool,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl McpServerEntry {
    /// Entry used when no configuration names this tool.
    pub fn default_entry() -> Self {
        Self {
            command: "ai-extension".to_string(),
            args: vec!["serve".to_string()],
            env: HashMap::new(),
            disabled: false,
            timeout: Some(60),
            description: None,
        }
    }
}

/// Shape of an MCP config file. Only `mcpServers` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct McpConfigFile {
    mcp_servers: Map<String, Value>,
}

/// Result of detection: the winning file's servers, or the default.
#[derive(Debug, Clone)]
pub struct DetectedMcpConfig {
    pub source: McpConfigSource,
    pub path: Option<PathBuf>,
    servers: Map<String, Value>,
}

impl DetectedMcpConfig {
    fn default_config() -> Self {
        let mut servers = Map::new();
        if let Ok(entry) = serde_json::to_value(McpServerEntry::default_entry()) {
            servers.insert(SERVER_NAME_CANDIDATES[0].to_string(), entry);
        }
        Self {
            source: McpConfigSource::Default,
            path: None,
            servers,
        }
    }

    /// Names of all servers in the detected file.
    pub fn server_names(&self) -> Vec<&str> {
        self.servers.keys().map(String::as_str).collect()
    }

    /// First enabled entry under one of [`SERVER_NAME_CANDIDATES`].
    pub fn find_server(&self) -> Option<(String, McpServerEntry)> {
        for name in SERVER_NAME_CANDIDATES {
            let Some(raw) = self.servers.get(*name) else {
                continue;
            };
            match serde_json::from_value::<McpServerEntry>(raw.clone()) {
                Ok(entry) if entry.disabled => debug!(name, "Skipping disabled server entry"),
                Ok(entry) => return Some((name.to_string(), entry)),
                Err(e) => warn!(name, error = %e, "Ignoring malformed server entry"),
            }
        }
        None
    }

    /// The server entry to launch, falling back to the built-in default.
    pub fn server_entry(&self) -> McpServerEntry {
        self.find_server()
            .map(|(_, entry)| entry)
            .unwrap_or_else(McpServerEntry::default_entry)
    }
}

/// Presence of one candidate config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFileStatus {
    pub source: McpConfigSource,
    pub path: PathBuf,
    pub exists: bool,
}

/// Finds the MCP server entry for this tool.
///
/// Constructed explicitly and consulted on demand; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct McpConfigDetector {
    home: Option<PathBuf>,
    explicit: Option<PathBuf>,
}

impl McpConfigDetector {
    /// Detector rooted at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: Some(home.into()),
            explicit: None,
        }
    }

    /// Detector rooted at the user's home directory, if one is known.
    pub fn from_home_dir() -> Self {
        Self {
            home: dirs::home_dir(),
            explicit: None,
        }
    }

    /// Check `path` before the well-known locations.
    pub fn with_explicit(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.explicit = path.map(Into::into);
        self
    }

    /// Candidate files in priority order.
    pub fn candidates(&self) -> Vec<(McpConfigSource, PathBuf)> {
        let mut candidates = Vec::new();
        if let Some(explicit) = &self.explicit {
            candidates.push((McpConfigSource::Explicit, explicit.clone()));
        }
        if let Some(home) = &self.home {
            candidates.push((
                McpConfigSource::Local,
                home.join(CONFIG_DIR).join(MCP_CONFIG_FILE),
            ));
            candidates.push((McpConfigSource::Cursor, home.join(".cursor").join("mcp.json")));
            candidates.push((McpConfigSource::Vscode, home.join(".vscode").join("mcp.json")));
        }
        candidates
    }

    /// First readable candidate with an `mcpServers` object, or the default.
    pub fn detect(&self) -> DetectedMcpConfig {
        for (source, path) in self.candidates() {
            if !path.exists() {
                continue;
            }
            match read_mcp_file(&path) {
                Ok(file) => {
                    info!(source = %source, path = %path.display(), "Loaded MCP configuration");
                    return DetectedMcpConfig {
                        source,
                        path: Some(path),
                        servers: file.mcp_servers,
                    };
                }
                Err(e) => {
                    warn!(source = %source, path = %path.display(), error = %e, "Skipping MCP configuration");
                }
            }
        }

        info!("No valid MCP configuration found, using default");
        DetectedMcpConfig::default_config()
    }

    /// Shortcut for `detect().server_entry()`.
    pub fn server_entry(&self) -> McpServerEntry {
        self.detect().server_entry()
    }

    /// Which candidate files exist.
    pub fn status(&self) -> Vec<ConfigFileStatus> {
        self.candidates()
            .into_iter()
            .map(|(source, path)| ConfigFileStatus {
                source,
                exists: path.exists(),
                path,
            })
            .collect()
    }
}

fn read_mcp_file(path: &Path) -> Result<McpConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ConfigError::InvalidFormat(format!("{}: {e}", path.display())))
}
