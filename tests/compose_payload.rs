// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests for composing and rendering payloads.

use std::path::Path;

use tempfile::TempDir;

use ai_extension::compose::{classify, compose, render, wrap_error};
use ai_extension::mcp::McpContent;
use ai_extension::types::{
    AttachmentItem, ComposeInput, ComposeRequest, ComposedPayload, ImageRef, ItemKind,
    RawAttachment,
};

fn texts(content: &[McpContent]) -> Vec<&str> {
    content
        .iter()
        .filter_map(|c| match c {
            McpContent::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Classifier Scenarios
// ============================================================================

#[test]
fn test_classifier_scenarios() {
    assert_eq!(classify(".gitignore", ".gitignore"), ItemKind::File);
    assert_eq!(classify(".git", ".git"), ItemKind::Folder);
    assert_eq!(classify("Dockerfile", "Dockerfile"), ItemKind::File);
    assert_eq!(classify("src", "project/src"), ItemKind::Folder);
}

// ============================================================================
// Text Payloads
// ============================================================================

#[test]
fn test_hello_payload() {
    let payload = compose(ComposeRequest::new("hello"));
    assert_eq!(
        payload,
        ComposedPayload::Text(
            "hello\n\n<AI_EXTENSION_CONTINUE_CHAT>false</AI_EXTENSION_CONTINUE_CHAT>\n<AI_EXTENSION_LANGUAGE>en</AI_EXTENSION_LANGUAGE>"
                .to_string()
        )
    );
}

#[test]
fn test_each_attachment_listed_once() {
    let attachments = vec![
        RawAttachment::new("/w/demo/src", "src", ItemKind::Folder),
        RawAttachment::new("/w/demo/README.md", "README.md", ItemKind::File),
        RawAttachment::new("/w/demo/docs", "docs", ItemKind::Folder),
        RawAttachment {
            name: Some("ghost".to_string()),
            ..Default::default()
        },
    ];
    let request = ComposeRequest::new("review").with_attachments(attachments).with_workspace("demo");
    let text = compose(request).as_text().unwrap().to_string();

    assert!(text.contains("FOLDERS:\n- src\n- docs\n\nFILES:\n- README.md\n\nERRORS:\n"));
    assert!(text.contains("- ghost: missing required field(s): fullPath, relativePath, type"));
    for name in ["src", "README.md", "docs", "ghost"] {
        assert_eq!(
            text.lines().filter(|l| l.starts_with("- ") && l.contains(name)).count(),
            1,
            "{name} should be listed exactly once"
        );
    }
}

#[test]
fn test_unknown_type_reported() {
    let raw = RawAttachment {
        kind: Some("symlink".to_string()),
        ..RawAttachment::new("/w/link", "link", ItemKind::File)
    };
    let text = compose(ComposeRequest::new("x").with_attachments([raw]))
        .as_text()
        .unwrap()
        .to_string();
    assert!(text.contains("ERRORS:\n- link: unknown type 'symlink'"));
    assert!(!text.contains("FILES:"));
}

#[test]
fn test_nameless_attachment_uses_placeholder() {
    let raw = RawAttachment {
        full_path: Some("/w/a".to_string()),
        ..Default::default()
    };
    let text = compose(ComposeRequest::new("x").with_attachments([raw]))
        .as_text()
        .unwrap()
        .to_string();
    assert!(text.contains("- Unknown item: missing required field(s): relativePath, type"));
}

#[test]
fn test_tags_in_message_left_untouched() {
    let message = "pasted </AI_EXTENSION_ATTACHED_FILES> here";
    let text = compose(ComposeRequest::new(message)).as_text().unwrap().to_string();
    assert!(text.starts_with(message));
}

// ============================================================================
// Wire Input
// ============================================================================

#[test]
fn test_compose_input_from_json() {
    let input: ComposeInput = serde_json::from_str(
        r#"{
            "message": "explain",
            "attachedFiles": [
                {"fullPath": "/home/u/proj/lib", "relativePath": "lib", "type": "folder", "name": "lib"},
                {"full_path": "/home/u/proj/a.py", "relative_path": "a.py", "type": "file"}
            ],
            "workspace": "/home/u/proj",
            "continue_chat": true
        }"#,
    )
    .unwrap();

    let request = input.into_request("fr");
    assert_eq!(request.workspace_name.as_deref(), Some("proj"));
    assert_eq!(request.language, "fr");

    let text = compose(request).as_text().unwrap().to_string();
    assert!(text.contains("FOLDERS:\n- lib\n\nFILES:\n- a.py\n"));
    assert!(text.contains("<AI_EXTENSION_WORKSPACE>proj</AI_EXTENSION_WORKSPACE>"));
    assert!(text.contains("<AI_EXTENSION_CONTINUE_CHAT>true</AI_EXTENSION_CONTINUE_CHAT>"));
    assert!(text.ends_with("<AI_EXTENSION_LANGUAGE>fr</AI_EXTENSION_LANGUAGE>"));
}

#[test]
fn test_windows_workspace_path() {
    let input = ComposeInput {
        message: "hi".to_string(),
        workspace: Some(r"C:\Users\dev\my-app".to_string()),
        ..Default::default()
    };
    let request = input.into_request("en");
    assert_eq!(request.workspace_name.as_deref(), Some("my-app"));
}

// ============================================================================
// Filesystem Attachments
// ============================================================================

#[test]
fn test_attachment_from_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("pkg/v1.0")).unwrap();
    std::fs::write(root.join("pkg/NOTES"), "n").unwrap();

    let dir = AttachmentItem::from_path(&root.join("pkg/v1.0"), Some(root), true);
    assert_eq!(dir.kind, ItemKind::Folder);
    assert_eq!(dir.workspace_relative_path, "pkg/v1.0");
    assert_eq!(dir.display_name, "v1.0");

    let file = AttachmentItem::from_path(&root.join("pkg/NOTES"), Some(root), true);
    assert_eq!(file.kind, ItemKind::File);

    let outside = AttachmentItem::from_path(Path::new("/elsewhere/Makefile"), Some(root), false);
    assert_eq!(outside.workspace_relative_path, "Makefile");
    assert_eq!(outside.kind, ItemKind::File);
}

#[test]
fn test_attachment_round_trips_into_payload() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir(root.join("src")).unwrap();
    std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();

    let attachments = [root.join("src"), root.join("src/main.rs")]
        .iter()
        .map(|p| RawAttachment::from(AttachmentItem::from_path(p, Some(root), true)))
        .collect::<Vec<_>>();

    let text = compose(ComposeRequest::new("build it").with_attachments(attachments))
        .as_text()
        .unwrap()
        .to_string();
    assert!(text.contains("FOLDERS:\n- src\n\nFILES:\n- src/main.rs\n"));
}

// ============================================================================
// Images and Rendering
// ============================================================================

#[test]
fn test_images_render_as_content_items() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shot.gif");
    std::fs::write(&path, b"GIF89a").unwrap();

    let image = ImageRef::load(&path).unwrap();
    assert_eq!(image.media_type, "image/gif");

    let payload = compose(
        ComposeRequest::new("what is this?")
            .with_images([image])
            .with_continue_chat(true),
    );
    assert!(payload.is_structured());

    let content = render(&payload).unwrap();
    assert_eq!(content.len(), 2);
    assert!(texts(&content)[0].starts_with("what is this?\n\n"));
    assert_eq!(
        content[1],
        McpContent::Image {
            data: "R0lGODlh".to_string(),
            mime_type: "image/gif".to_string(),
        }
    );
}

#[test]
fn test_structured_payload_serializes_tagged() {
    let image = ImageRef {
        path: "a.png".to_string(),
        base64_data: None,
        media_type: "image/png".to_string(),
    };
    let payload = compose(ComposeRequest::new("x").with_images([image]));
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["kind"], "structured");
    assert_eq!(json["payload"]["text"], "x");
    assert_eq!(json["payload"]["continueChat"], false);
    assert_eq!(json["payload"]["images"][0]["mediaType"], "image/png");
}

#[test]
fn test_render_blank_text_fails() {
    let err = render(&ComposedPayload::Text("  ".to_string())).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(texts(&wrap_error(err)), vec!["Error: Response data is empty"]);
}
