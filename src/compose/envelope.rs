// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Response envelope construction.
//!
//! Wraps composed text (or an error message) in the content-item list shape
//! of an MCP `tools/call` result.

use std::path::Path;

use tracing::warn;

use super::composer::{compose_sections, AttachmentSections};
use super::image;
use super::tags::ERROR_PREFIX;
use crate::error::ComposeError;
use crate::mcp::types::McpContent;
use crate::types::{base_name, AttachmentFieldError, ComposedPayload, ImageRef, StructuredPayload};

/// Reject null or blank payloads.
pub fn validate_payload(data: Option<&str>) -> Result<(), ComposeError> {
    match data {
        None => Err(ComposeError::validation("Response data is None")),
        Some(text) if text.trim().is_empty() => {
            Err(ComposeError::validation("Response data is empty"))
        }
        Some(_) => Ok(()),
    }
}

/// Wrap composed text as a single text item.
pub fn wrap(content: &str) -> Result<Vec<McpContent>, ComposeError> {
    validate_payload(Some(content))?;
    Ok(vec![McpContent::text(content)])
}

/// Wrap an error message as a single `Error: ...` text item.
pub fn wrap_error(message: impl std::fmt::Display) -> Vec<McpContent> {
    vec![McpContent::text(format!("{ERROR_PREFIX}{message}"))]
}

/// Render either payload variant into content items.
///
/// Structured payloads become their composed text followed by one image item
/// per usable image. An image without data is read from its path. Images
/// that cannot be used are listed in the `ERRORS:` section of the text.
pub fn render(payload: &ComposedPayload) -> Result<Vec<McpContent>, ComposeError> {
    match payload {
        ComposedPayload::Text(text) => wrap(text),
        ComposedPayload::Structured(structured) => render_structured(structured),
    }
}

fn render_structured(payload: &StructuredPayload) -> Result<Vec<McpContent>, ComposeError> {
    let mut sections = AttachmentSections::partition(&payload.files);
    let mut images = Vec::with_capacity(payload.images.len());

    for image_ref in &payload.images {
        match image_content(image_ref) {
            Ok(item) => images.push(item),
            Err(e) => {
                warn!(path = %image_ref.path, error = %e, "Image not attached");
                sections.errors.push(AttachmentFieldError {
                    item: base_name(&image_ref.path).to_string(),
                    reason: image_failure_reason(e),
                });
            }
        }
    }

    let text = compose_sections(
        &payload.text,
        &sections,
        payload.workspace.as_deref(),
        payload.continue_chat,
        &payload.language,
    );
    let mut content = wrap(&text)?;
    content.extend(images);
    Ok(content)
}

/// Image item for a reference, loading the file when no data was sent.
fn image_content(image_ref: &ImageRef) -> Result<McpContent, ComposeError> {
    match image_ref.base64_data.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(data) => {
            image::validate_base64(&image_ref.path, data)?;
            Ok(McpContent::Image {
                data: data.trim().to_string(),
                mime_type: image_ref.media_type.clone(),
            })
        }
        None => {
            let loaded = ImageRef::load(Path::new(&image_ref.path))?;
            let mime_type = if image_ref.media_type.trim().is_empty() {
                loaded.media_type
            } else {
                image_ref.media_type.clone()
            };
            Ok(McpContent::Image {
                data: loaded.base64_data.unwrap_or_default(),
                mime_type,
            })
        }
    }
}

fn image_failure_reason(err: ComposeError) -> String {
    match err {
        ComposeError::InvalidImage { message, .. } => format!("image not attached: {message}"),
        other => format!("image not attached: {other}"),
    }
}
