// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Image attachment loading and validation.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ComposeError;
use crate::types::ImageRef;

/// Media type for an image path, from its extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Check that `data` is valid, non-empty base64.
pub fn validate_base64(path: &str, data: &str) -> Result<(), ComposeError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| ComposeError::invalid_image(path, e.to_string()))?;
    if bytes.is_empty() {
        return Err(ComposeError::invalid_image(path, "no image data"));
    }
    Ok(())
}

impl ImageRef {
    /// Read an image from disk and encode it.
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ComposeError::invalid_image(path.display().to_string(), e.to_string()))?;
        if bytes.is_empty() {
            return Err(ComposeError::invalid_image(path.display().to_string(), "file is empty"));
        }

        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            base64_data: Some(STANDARD.encode(&bytes)),
            media_type: media_type_for_path(path).to_string(),
        })
    }
}
