// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Message and attachment serialization.
//!
//! Three stages compose linearly:
//!
//! ```text
//! ComposeRequest ──► classifier ──► composer ──► envelope ──► Vec<McpContent>
//!                    (file/folder)  (tagged text   (text/error
//!                                    or structured) items)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_extension::compose::{compose, render};
//! use ai_extension::types::ComposeRequest;
//!
//! let payload = compose(ComposeRequest::new("hello"));
//! let content = render(&payload)?;
//! ```

pub mod classifier;
pub mod composer;
pub mod envelope;
pub mod image;
pub mod tags;

pub use classifier::{classify, classify_path};
pub use composer::{compose, compose_text, AttachmentSections};
pub use envelope::{render, validate_payload, wrap, wrap_error};
pub use image::media_type_for_path;
