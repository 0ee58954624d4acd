// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Payload composition.
//!
//! Merges the free-text message, the attachments, and the conversation flags
//! into one tagged text block. Requests that carry images skip text
//! composition and come back as a [`StructuredPayload`].
//!
//! # Layout
//!
//! ```text
//! <message>
//!
//! <AI_EXTENSION_ATTACHED_FILES>
//! FOLDERS:
//! - src
//!
//! FILES:
//! - Cargo.toml
//! </AI_EXTENSION_ATTACHED_FILES>
//!
//! <AI_EXTENSION_WORKSPACE>demo</AI_EXTENSION_WORKSPACE>
//!
//! <AI_EXTENSION_CONTINUE_CHAT>false</AI_EXTENSION_CONTINUE_CHAT>
//! <AI_EXTENSION_LANGUAGE>en</AI_EXTENSION_LANGUAGE>
//! ```

use tracing::{debug, warn};

use super::tags::{
    contains_wire_tag, tagged, ATTACHED_FILES_CLOSE, ATTACHED_FILES_OPEN, CONTINUE_CHAT_CLOSE,
    CONTINUE_CHAT_OPEN, ERRORS_HEADER, FILES_HEADER, FOLDERS_HEADER, LANGUAGE_CLOSE,
    LANGUAGE_OPEN, WORKSPACE_CLOSE, WORKSPACE_OPEN,
};
use crate::types::{
    AttachmentFieldError, AttachmentItem, ComposeRequest, ComposedPayload, ItemKind,
    RawAttachment, StructuredPayload,
};

/// Compose a request into its payload.
pub fn compose(request: ComposeRequest) -> ComposedPayload {
    if contains_wire_tag(&request.message) {
        warn!("Message contains a literal wire tag; the composed payload may be ambiguous");
    }

    if !request.images.is_empty() {
        debug!(
            images = request.images.len(),
            attachments = request.attachments.len(),
            "Composing structured payload"
        );
        return ComposedPayload::Structured(StructuredPayload {
            text: request.message,
            files: request.attachments,
            images: request.images,
            workspace: request.workspace_name,
            continue_chat: request.continue_chat,
            language: request.language,
        });
    }

    ComposedPayload::Text(compose_text(
        &request.message,
        &request.attachments,
        request.workspace_name.as_deref(),
        request.continue_chat,
        &request.language,
    ))
}

/// Render the tagged text block.
pub fn compose_text(
    message: &str,
    attachments: &[RawAttachment],
    workspace: Option<&str>,
    continue_chat: bool,
    language: &str,
) -> String {
    compose_sections(
        message,
        &AttachmentSections::partition(attachments),
        workspace,
        continue_chat,
        language,
    )
}

/// Render the tagged text block from already partitioned sections.
pub fn compose_sections(
    message: &str,
    sections: &AttachmentSections,
    workspace: Option<&str>,
    continue_chat: bool,
    language: &str,
) -> String {
    let mut lines: Vec<String> = vec![message.to_string(), String::new()];

    if !sections.is_empty() {
        debug!(
            folders = sections.folders.len(),
            files = sections.files.len(),
            errors = sections.errors.len(),
            "Composing attachment block"
        );

        lines.push(ATTACHED_FILES_OPEN.to_string());
        lines.extend(sections.render());
        lines.push(ATTACHED_FILES_CLOSE.to_string());
        lines.push(String::new());

        if let Some(workspace) = workspace.filter(|w| !w.is_empty()) {
            lines.push(tagged(WORKSPACE_OPEN, workspace, WORKSPACE_CLOSE));
            lines.push(String::new());
        }
    }

    lines.push(tagged(
        CONTINUE_CHAT_OPEN,
        if continue_chat { "true" } else { "false" },
        CONTINUE_CHAT_CLOSE,
    ));
    lines.push(tagged(LANGUAGE_OPEN, language, LANGUAGE_CLOSE));

    lines.join("\n")
}

/// Attachments split by kind, in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttachmentSections {
    pub folders: Vec<AttachmentItem>,
    pub files: Vec<AttachmentItem>,
    pub errors: Vec<AttachmentFieldError>,
}

impl AttachmentSections {
    /// Resolve every attachment; failures are collected, not fatal.
    pub fn partition(attachments: &[RawAttachment]) -> Self {
        let mut sections = Self::default();
        for raw in attachments {
            match raw.resolve() {
                Ok(item) if item.kind == ItemKind::Folder => sections.folders.push(item),
                Ok(item) => sections.files.push(item),
                Err(err) => {
                    debug!(item = %err.item, reason = %err.reason, "Skipping attachment");
                    sections.errors.push(err);
                }
            }
        }
        sections
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty() && self.errors.is_empty()
    }

    /// Lines of the non-empty sections, separated by a blank line.
    pub fn render(&self) -> Vec<String> {
        let item_lines = |items: &[AttachmentItem]| -> Vec<String> {
            items
                .iter()
                .map(|item| format!("- {}", item.workspace_relative_path))
                .collect()
        };

        let blocks = [
            (FOLDERS_HEADER, item_lines(self.folders.as_slice())),
            (FILES_HEADER, item_lines(self.files.as_slice())),
            (
                ERRORS_HEADER,
                self.errors.iter().map(|err| format!("- {}", err)).collect(),
            ),
        ];

        let mut lines: Vec<String> = Vec::new();
        for (header, items) in blocks.into_iter().filter(|(_, items)| !items.is_empty()) {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(header.to_string());
            lines.extend(items);
        }
        lines
    }
}
