// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! AI extension - hand a composed message, with attachments, to an AI
//! coding assistant over MCP.
//!
//! The user types a message and attaches files, folders and images. This
//! crate turns that into a tagged text payload the assistant understands
//! and serves it as an MCP tool over stdio.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`types`] - Core type definitions (attachments, requests, payloads)
//! - [`error`] - Error types
//! - [`compose`] - Classifier, payload composer and response envelope
//! - [`mcp`] - rmcp-based server, client and the compose tool
//! - [`config`] - App settings and MCP server entry detection
//! - [`telemetry`] - Tracing initialization
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_extension::compose::compose;
//! use ai_extension::types::{ComposeRequest, ItemKind, RawAttachment};
//!
//! let request = ComposeRequest::new("Why does this fail?")
//!     .with_attachments([RawAttachment::new("/w/demo/src/lib.rs", "src/lib.rs", ItemKind::File)])
//!     .with_workspace("demo");
//! let payload = compose(request);
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod mcp;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use compose::{classify, compose, render, wrap, wrap_error};
pub use error::{ComposeError, ConfigError};
pub use mcp::{McpClient, McpError, McpServer};
pub use types::{
    AttachmentItem, ComposeInput, ComposeRequest, ComposedPayload, ImageRef, ItemKind,
    RawAttachment, StructuredPayload,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
