// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wire tags embedded in the composed text.
//!
//! The receiving side parses these literally; they must not change.

pub const ATTACHED_FILES_OPEN: &str = "<AI_EXTENSION_ATTACHED_FILES>";
pub const ATTACHED_FILES_CLOSE: &str = "</AI_EXTENSION_ATTACHED_FILES>";

pub const WORKSPACE_OPEN: &str = "<AI_EXTENSION_WORKSPACE>";
pub const WORKSPACE_CLOSE: &str = "</AI_EXTENSION_WORKSPACE>";

pub const CONTINUE_CHAT_OPEN: &str = "<AI_EXTENSION_CONTINUE_CHAT>";
pub const CONTINUE_CHAT_CLOSE: &str = "</AI_EXTENSION_CONTINUE_CHAT>";

pub const LANGUAGE_OPEN: &str = "<AI_EXTENSION_LANGUAGE>";
pub const LANGUAGE_CLOSE: &str = "</AI_EXTENSION_LANGUAGE>";

pub const FOLDERS_HEADER: &str = "FOLDERS:";
pub const FILES_HEADER: &str = "FILES:";
pub const ERRORS_HEADER: &str = "ERRORS:";

/// Prefix of every error item returned to the caller.
pub const ERROR_PREFIX: &str = "Error: ";

/// Wrap `value` in an open/close tag pair.
pub fn tagged(open: &str, value: &str, close: &str) -> String {
    format!("{open}{value}{close}")
}

/// Every wire tag, for callers that want to detect collisions in free text.
pub const ALL_TAGS: &[&str] = &[
    ATTACHED_FILES_OPEN,
    ATTACHED_FILES_CLOSE,
    WORKSPACE_OPEN,
    WORKSPACE_CLOSE,
    CONTINUE_CHAT_OPEN,
    CONTINUE_CHAT_CLOSE,
    LANGUAGE_OPEN,
    LANGUAGE_CLOSE,
];

/// Whether `text` contains any literal wire tag.
///
/// The composer does not escape these; this only lets callers warn about it.
pub fn contains_wire_tag(text: &str) -> bool {
    ALL_TAGS.iter().any(|tag| text.contains(tag))
}
