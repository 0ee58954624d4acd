// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Settings file discovery and parsing.
//!
//! A workspace carries at most one settings file, `.ai-extension.json` or
//! `.ai-extension.yaml`. It is found by walking up from the working directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::WorkspaceConfig;

/// Settings file names, JSON first.
pub const SETTINGS_FILES: [&str; 2] = [".ai-extension.json", ".ai-extension.yaml"];

/// Find the nearest settings file at or above `start`.
pub fn locate_settings(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        SETTINGS_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Parse a settings file. `.yaml` and `.yml` are read as YAML, anything else as JSON.
pub fn read_settings(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}
