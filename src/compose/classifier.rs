// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Name-based file/folder classification.
//!
//! [`classify`] never touches the filesystem: it is a best-effort heuristic
//! and will misclassify extension-less files it does not know about, as well
//! as directories with a dot in their name.

use std::path::Path;

use crate::types::{base_name, ItemKind};

/// Extension-less names that are files.
const KNOWN_FILES_WITHOUT_EXT: &[&str] = &[
    "dockerfile",
    "makefile",
    "readme",
    "license",
    "changelog",
    "authors",
    "contributors",
    "copying",
    "install",
    "news",
    "procfile",
    "rakefile",
    "gemfile",
    "vagrantfile",
];

/// Dot-files with no second dot.
const KNOWN_HIDDEN_FILES: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".gitkeep",
    ".env",
    ".editorconfig",
    ".dockerignore",
    ".npmrc",
    ".nvmrc",
    ".yarnrc",
    ".babelrc",
    ".eslintrc",
    ".eslintignore",
    ".prettierrc",
    ".prettierignore",
    ".htaccess",
    ".bashrc",
    ".zshrc",
    ".profile",
    ".mailmap",
];

/// Names that are almost always directories.
const COMMON_FOLDER_NAMES: &[&str] = &[
    "src",
    "lib",
    "bin",
    "test",
    "tests",
    "docs",
    "doc",
    "build",
    "dist",
    "node_modules",
    "vendor",
    "assets",
    "static",
    "public",
    "components",
    "utils",
    "helpers",
    "config",
    "configs",
    "scripts",
    "tools",
];

/// Classify an item from its base name and workspace-relative path.
pub fn classify(name: &str, relative_path: &str) -> ItemKind {
    // Hidden entries: `.gitignore` is a file, `.git` a folder.
    if let Some(rest) = name.strip_prefix('.') {
        let lower = name.to_lowercase();
        return if rest.contains('.') || KNOWN_HIDDEN_FILES.contains(&lower.as_str()) {
            ItemKind::File
        } else {
            ItemKind::Folder
        };
    }

    let lower = name.to_lowercase();
    if KNOWN_FILES_WITHOUT_EXT.contains(&lower.as_str()) {
        return ItemKind::File;
    }

    if has_extension(name) {
        return ItemKind::File;
    }

    // The next two rules agree with the fall-through; they stay so the
    // checks read in the same order as the classification rules.
    if COMMON_FOLDER_NAMES.contains(&lower.as_str()) {
        return ItemKind::Folder;
    }

    // workspace/folder/... without an extension
    if relative_path.split('/').count() > 2 {
        return ItemKind::Folder;
    }

    ItemKind::Folder
}

/// Classify a path, optionally trusting filesystem metadata when it exists.
pub fn classify_path(path: &Path, relative_path: &str, use_metadata: bool) -> ItemKind {
    if use_metadata {
        if let Ok(metadata) = std::fs::metadata(path) {
            return if metadata.is_dir() {
                ItemKind::Folder
            } else {
                ItemKind::File
            };
        }
    }

    let path_str = path.to_string_lossy();
    classify(base_name(&path_str), relative_path)
}

fn has_extension(name: &str) -> bool {
    name.contains('.') && !name.ends_with('.')
}
