// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Blank strings and zero timeouts never override a default.

use std::path::PathBuf;

use super::types::{ResolvedConfig, WorkspaceConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub language: Option<String>,
    pub continue_chat: Option<bool>,
    pub tool_name: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub no_metadata: Option<bool>,
    pub mcp_config: Option<PathBuf>,
}

/// Apply the settings file, then CLI options, over the defaults.
pub fn merge_config(file: Option<WorkspaceConfig>, cli: CliOptions) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(config) = &file {
        apply_workspace_config(&mut result, config);
    }

    apply_cli_options(&mut result, &cli);

    result
}

fn apply_workspace_config(result: &mut ResolvedConfig, config: &WorkspaceConfig) {
    if let Some(language) = non_blank(&config.language) {
        result.language = language;
    }

    if let Some(continue_chat) = config.continue_chat {
        result.continue_chat = continue_chat;
    }

    if let Some(tool_name) = non_blank(&config.tool_name) {
        result.tool_name = tool_name;
    }

    if let Some(server_name) = non_blank(&config.server_name) {
        result.server_name = server_name;
    }

    // Zero timeouts are ignored.
    if let Some(secs) = config.request_timeout_sec.filter(|s| *s > 0) {
        result.request_timeout_sec = secs;
    }

    if let Some(secs) = config.startup_timeout_sec.filter(|s| *s > 0) {
        result.startup_timeout_sec = secs;
    }

    if let Some(secs) = config.shutdown_timeout_sec.filter(|s| *s > 0) {
        result.shutdown_timeout_sec = secs;
    }

    if let Some(enabled) = config.use_metadata {
        result.use_metadata = enabled;
    }

    if config.mcp_config.is_some() {
        result.mcp_config = config.mcp_config.clone();
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: &CliOptions) {
    if let Some(language) = non_blank(&cli.language) {
        result.language = language;
    }

    if let Some(continue_chat) = cli.continue_chat {
        result.continue_chat = continue_chat;
    }

    if let Some(tool_name) = non_blank(&cli.tool_name) {
        result.tool_name = tool_name;
    }

    if let Some(secs) = cli.request_timeout_sec.filter(|s| *s > 0) {
        result.request_timeout_sec = secs;
    }

    if cli.no_metadata == Some(true) {
        result.use_metadata = false;
    }

    if cli.mcp_config.is_some() {
        result.mcp_config = cli.mcp_config.clone();
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = merge_config(None, CliOptions::default());
        assert_eq!(config.language, "en");
        assert!(!config.continue_chat);
    }

    #[test]
    fn test_cli_beats_file() {
        let file = WorkspaceConfig {
            language: Some("de".to_string()),
            tool_name: Some("file_tool".to_string()),
            continue_chat: Some(true),
            ..Default::default()
        };
        let cli = CliOptions {
            language: Some("vi".to_string()),
            ..Default::default()
        };

        let result = merge_config(Some(file), cli);
        assert_eq!(result.language, "vi");
        assert_eq!(result.tool_name, "file_tool");
        assert!(result.continue_chat);
    }

    #[test]
    fn test_blank_values_ignored() {
        let file = WorkspaceConfig {
            language: Some("  ".to_string()),
            request_timeout_sec: Some(0),
            ..Default::default()
        };

        let result = merge_config(Some(file), CliOptions::default());
        assert_eq!(result.language, "en");
        assert_eq!(result.request_timeout_sec, 60);
    }

    #[test]
    fn test_cli_no_metadata() {
        let file = WorkspaceConfig {
            use_metadata: Some(true),
            ..Default::default()
        };
        let cli = CliOptions {
            no_metadata: Some(true),
            mcp_config: Some(PathBuf::from("/etc/mcp.json")),
            ..Default::default()
        };

        let result = merge_config(Some(file), cli);
        assert!(!result.use_metadata);
        assert_eq!(result.mcp_config, Some(PathBuf::from("/etc/mcp.json")));
    }
}
