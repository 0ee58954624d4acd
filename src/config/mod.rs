// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module.
//!
//! Settings come from one optional workspace file (`.ai-extension.json` or
//! `.ai-extension.yaml`, found by walking up from the working directory) and
//! from command-line options, which take precedence.
//!
//! Detection of the MCP server entry from IDE config files lives in [`detect`].

pub mod detect;
mod loader;
mod merger;
mod types;

pub use detect::{
    ConfigFileStatus, DetectedMcpConfig, McpConfigDetector, McpConfigSource, McpServerEntry,
    CONFIG_DIR, MCP_CONFIG_FILE, SERVER_NAME_CANDIDATES,
};

pub use loader::{locate_settings, read_settings, SETTINGS_FILES};

pub use merger::{merge_config, CliOptions};

pub use types::{ResolvedConfig, WorkspaceConfig, DEFAULT_SERVER_NAME};

use crate::error::ConfigError;
use std::path::Path;
use tracing::debug;

/// Resolve settings for a command started in `start`.
pub fn load_config(start: &Path, cli_options: CliOptions) -> Result<ResolvedConfig, ConfigError> {
    let file = match locate_settings(start) {
        Some(path) => {
            debug!(path = %path.display(), "Reading settings");
            Some(read_settings(&path)?)
        }
        None => None,
    };

    Ok(merge_config(file, cli_options))
}
