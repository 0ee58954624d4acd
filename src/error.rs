// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the AI extension tool.
//!
//! This module provides strongly-typed errors for different parts of the application,
//! using `thiserror`; the binary propagates them through `anyhow`.
//! MCP transport errors live in [`crate::mcp::McpError`].

use thiserror::Error;

/// Errors that can occur while composing or wrapping a payload.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Null or empty payload.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid image '{path}': {message}")]
    InvalidImage { path: String, message: String },
}

impl ComposeError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid image error.
    pub fn invalid_image(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidImage {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}
