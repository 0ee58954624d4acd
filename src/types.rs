// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core types for the AI extension tool.
//!
//! This module defines the data that flows through the compose pipeline:
//! attachments as they arrive on the wire, classified attachment items,
//! image references, the compose request, and the composed payload.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::compose::classifier;

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Label used in error lines for attachments without a name.
pub const UNKNOWN_ITEM: &str = "Unknown item";

// ============================================================================
// Attachment Types
// ============================================================================

/// Whether an attachment refers to a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

impl ItemKind {
    /// Parse the wire form (`"file"` / `"folder"`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "folder" => Some(Self::Folder),
            _ => None,
        }
    }

    /// Wire form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified attachment.
///
/// Classified once at attach time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentItem {
    /// Full path as given by the caller.
    pub path: String,

    /// Name shown to the user (base name of the item).
    pub display_name: String,

    /// File or folder.
    pub kind: ItemKind,

    /// Path relative to the workspace root, with `/` separators.
    pub workspace_relative_path: String,
}

impl AttachmentItem {
    /// Build an attachment from a filesystem path.
    ///
    /// The relative path is computed against `workspace_root` when the path lies
    /// under it, otherwise the base name is used. With `use_metadata` set, an existing
    /// path is classified from its metadata instead of its name.
    pub fn from_path(path: &Path, workspace_root: Option<&Path>, use_metadata: bool) -> Self {
        let relative = workspace_root
            .and_then(|root| path.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_else(|| base_name(&path.to_string_lossy()).to_string());

        let display_name = base_name(&relative).to_string();
        let kind = classifier::classify_path(path, &relative, use_metadata);

        Self {
            path: path.to_string_lossy().into_owned(),
            display_name,
            kind,
            workspace_relative_path: relative,
        }
    }
}

/// An attachment as received from the GUI or extension host.
///
/// Every field is optional so that an incomplete entry can be reported in the
/// `ERRORS:` section instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttachment {
    #[serde(default, alias = "full_path", skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,

    #[serde(default, alias = "relative_path", skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Why a raw attachment could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{item}: {reason}")]
pub struct AttachmentFieldError {
    /// The attachment's name, or [`UNKNOWN_ITEM`].
    pub item: String,
    pub reason: String,
}

impl RawAttachment {
    /// Create a complete raw attachment.
    pub fn new(full_path: impl Into<String>, relative_path: impl Into<String>, kind: ItemKind) -> Self {
        let relative_path = relative_path.into();
        Self {
            full_path: Some(full_path.into()),
            name: Some(base_name(&relative_path).to_string()),
            relative_path: Some(relative_path),
            kind: Some(kind.as_str().to_string()),
        }
    }

    /// Name used when reporting problems with this entry.
    pub fn label(&self) -> &str {
        present(&self.name).unwrap_or(UNKNOWN_ITEM)
    }

    /// Resolve into a classified item, or report the missing/invalid fields.
    pub fn resolve(&self) -> Result<AttachmentItem, AttachmentFieldError> {
        let full_path = present(&self.full_path);
        let relative_path = present(&self.relative_path);
        let kind = present(&self.kind);

        let missing: Vec<&str> = [
            ("fullPath", full_path.is_none()),
            ("relativePath", relative_path.is_none()),
            ("type", kind.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        let (Some(full_path), Some(relative_path), Some(kind)) = (full_path, relative_path, kind)
        else {
            return Err(AttachmentFieldError {
                item: self.label().to_string(),
                reason: format!("missing required field(s): {}", missing.join(", ")),
            });
        };

        let kind = ItemKind::parse(kind).ok_or_else(|| AttachmentFieldError {
            item: self.label().to_string(),
            reason: format!("unknown type '{}'", kind),
        })?;

        Ok(AttachmentItem {
            path: full_path.to_string(),
            display_name: present(&self.name)
                .unwrap_or_else(|| base_name(relative_path))
                .to_string(),
            kind,
            workspace_relative_path: relative_path.to_string(),
        })
    }
}

impl From<AttachmentItem> for RawAttachment {
    fn from(item: AttachmentItem) -> Self {
        Self {
            full_path: Some(item.path),
            relative_path: Some(item.workspace_relative_path),
            kind: Some(item.kind.as_str().to_string()),
            name: Some(item.display_name),
        }
    }
}

// ============================================================================
// Image Types
// ============================================================================

/// An image attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub path: String,

    /// Base64-encoded image bytes.
    #[serde(default, alias = "base64", skip_serializing_if = "Option::is_none")]
    pub base64_data: Option<String>,

    /// Inferred from the file extension when blank.
    #[serde(default)]
    pub media_type: String,
}

// ============================================================================
// Request / Payload Types
// ============================================================================

/// A single user submission, consumed once by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    pub message: String,
    pub attachments: Vec<RawAttachment>,
    pub images: Vec<ImageRef>,
    pub workspace_name: Option<String>,
    pub continue_chat: bool,
    pub language: String,
}

impl ComposeRequest {
    /// Create a request with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachments: Vec::new(),
            images: Vec::new(),
            workspace_name: None,
            continue_chat: false,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = RawAttachment>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageRef>) -> Self {
        self.images = images.into_iter().collect();
        self
    }

    pub fn with_workspace(mut self, workspace_name: impl Into<String>) -> Self {
        self.workspace_name = Some(workspace_name.into());
        self
    }

    pub fn with_continue_chat(mut self, continue_chat: bool) -> Self {
        self.continue_chat = continue_chat;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether the request carries nothing to send.
    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty() && self.attachments.is_empty() && self.images.is_empty()
    }
}

/// Wire record handed over by the GUI or extension host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeInput {
    #[serde(default, alias = "text")]
    pub message: String,

    #[serde(default, alias = "attached_files")]
    pub attached_files: Vec<RawAttachment>,

    #[serde(default, alias = "attached_images")]
    pub attached_images: Vec<ImageRef>,

    /// Workspace name or full workspace path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    #[serde(default, alias = "continue_chat")]
    pub continue_chat: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ComposeInput {
    /// Convert into a compose request, falling back to `default_language`.
    pub fn into_request(self, default_language: &str) -> ComposeRequest {
        ComposeRequest {
            message: self.message,
            attachments: self.attached_files,
            images: self.attached_images,
            workspace_name: self.workspace.as_deref().and_then(workspace_name),
            continue_chat: self.continue_chat,
            language: self
                .language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| default_language.to_string()),
        }
    }
}

/// Structured record produced when a request carries images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredPayload {
    pub text: String,
    pub files: Vec<RawAttachment>,
    pub images: Vec<ImageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    pub continue_chat: bool,
    pub language: String,
}

/// Output of the composer: exactly one variant per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum ComposedPayload {
    /// Tagged text ready to hand to the model.
    Text(String),

    /// Images present; the caller renders them separately.
    Structured(StructuredPayload),
}

impl ComposedPayload {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// The composed text, if this is the text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Last path component, accepting both `/` and `\` separators.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Workspace name from a name or a full workspace path.
pub fn workspace_name(workspace: &str) -> Option<String> {
    let name = base_name(workspace.trim());
    (!name.is_empty()).then(|| name.to_string())
}
