// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory tests for the MCP server and client.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

use ai_extension::mcp::{
    ClientOptions, McpClient, McpContent, McpError, McpServer, ServerInfo, ToolRegistry,
    DEFAULT_TOOL_NAME, PROTOCOL_VERSION,
};

fn server(tool_name: &str) -> McpServer {
    McpServer::new(
        ToolRegistry::with_compose_tool(tool_name, "en"),
        ServerInfo::this_server(),
    )
}

async fn start_server(tool_name: &str) -> (McpClient, JoinHandle<Result<(), McpError>>) {
    let (client_io, server_io) = duplex(64 * 1024);
    let handle = tokio::spawn(server(tool_name).run(server_io));

    let options = ClientOptions::default().with_request_timeout(Duration::from_secs(5));
    let client = McpClient::connect(client_io, options).await.unwrap();
    (client, handle)
}

// ============================================================================
// Client/Server Round Trip
// ============================================================================

#[tokio::test]
async fn test_handshake_and_list_tools() {
    let (mut client, handle) = start_server(DEFAULT_TOOL_NAME).await;

    let info = client.server_info();
    assert_eq!(info.name, "ai-extension");
    assert_eq!(info.protocol_version.as_deref(), Some(PROTOCOL_VERSION));

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, DEFAULT_TOOL_NAME);
    assert!(tools[0].input_schema["properties"]["attachedFiles"].is_object());
    assert_eq!(client.tools().len(), 1);

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_call_compose_tool() {
    let (client, handle) = start_server("compose").await;

    let result = client
        .call_tool(
            "compose",
            json!({
                "message": "Fix the tests",
                "attachedFiles": [
                    {"fullPath": "/w/app/tests", "relativePath": "tests", "type": "folder", "name": "tests"},
                    {"fullPath": "/w/app/Cargo.toml", "relativePath": "Cargo.toml", "type": "file", "name": "Cargo.toml"},
                    {"name": "broken.rs", "type": "file"}
                ],
                "workspace": "/w/app",
                "continueChat": true,
                "language": "vi"
            }),
        )
        .await
        .unwrap();

    assert!(result.success());
    let expected = [
        "Fix the tests",
        "",
        "<AI_EXTENSION_ATTACHED_FILES>",
        "FOLDERS:",
        "- tests",
        "",
        "FILES:",
        "- Cargo.toml",
        "",
        "ERRORS:",
        "- broken.rs: missing required field(s): fullPath, relativePath",
        "</AI_EXTENSION_ATTACHED_FILES>",
        "",
        "<AI_EXTENSION_WORKSPACE>app</AI_EXTENSION_WORKSPACE>",
        "",
        "<AI_EXTENSION_CONTINUE_CHAT>true</AI_EXTENSION_CONTINUE_CHAT>",
        "<AI_EXTENSION_LANGUAGE>vi</AI_EXTENSION_LANGUAGE>",
    ]
    .join("\n");
    assert_eq!(result.as_text(), expected);

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_call_with_image_returns_image_item() {
    let (client, handle) = start_server(DEFAULT_TOOL_NAME).await;

    let result = client
        .call_tool(
            DEFAULT_TOOL_NAME,
            json!({
                "message": "see screenshot",
                "attachedImages": [{"path": "s.png", "base64Data": "aGVsbG8=", "mediaType": "image/png"}]
            }),
        )
        .await
        .unwrap();

    assert!(result.success());
    assert_eq!(result.content.len(), 2);
    assert!(matches!(&result.content[1], McpContent::Image { data, .. } if data == "aGVsbG8="));

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_image_path_without_data_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

    let (client, handle) = start_server(DEFAULT_TOOL_NAME).await;
    let result = client
        .call_tool(
            DEFAULT_TOOL_NAME,
            json!({
                "message": "look",
                "attachedImages": [
                    {"path": path.to_string_lossy()},
                    {"path": "/no/such/dir/gone.png"}
                ]
            }),
        )
        .await
        .unwrap();

    assert!(result.success());
    assert_eq!(result.content.len(), 2);
    assert!(result.as_text().contains("- gone.png: image not attached: "));
    match &result.content[1] {
        McpContent::Image { data, mime_type } => {
            assert_eq!(data, "iVBORw0KGgo=");
            assert_eq!(mime_type, "image/png");
        }
        other => panic!("expected image content, got {other:?}"),
    }

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_blank_call_is_tool_error() {
    let (client, handle) = start_server(DEFAULT_TOOL_NAME).await;

    let result = client.call_tool(DEFAULT_TOOL_NAME, json!({})).await.unwrap();
    assert!(result.is_error);
    assert_eq!(result.as_text(), "Error: Response data is empty");

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let (client, handle) = start_server(DEFAULT_TOOL_NAME).await;

    let err = client.call_tool("nope", json!({})).await.unwrap_err();
    assert!(matches!(err, McpError::Protocol { code: -32602, .. }));

    // The session survives a failed call.
    let result = client
        .call_tool(DEFAULT_TOOL_NAME, json!({"message": "ok"}))
        .await
        .unwrap();
    assert!(result.success());

    client.shutdown().await.unwrap();
    handle.await.unwrap().unwrap();
}

// ============================================================================
// Raw Wire Behavior
// ============================================================================

#[tokio::test]
async fn test_raw_lines() {
    let (client_io, server_io) = duplex(64 * 1024);
    let handle = tokio::spawn(server(DEFAULT_TOOL_NAME).run(server_io));

    let (reader, mut writer) = tokio::io::split(client_io);
    let mut lines = BufReader::new(reader).lines();

    let initialize = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {"name": "raw", "version": "0"}
        }
    });
    writer
        .write_all(format!("{initialize}\n").as_bytes())
        .await
        .unwrap();

    let line = lines.next_line().await.unwrap().unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(response["result"]["serverInfo"]["name"], "ai-extension");
    assert!(response["result"]["capabilities"]["tools"].is_object());

    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
    );
    writer.write_all(input.as_bytes()).await.unwrap();

    let line = lines.next_line().await.unwrap().unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["id"], 2);
    assert_eq!(response["result"]["tools"][0]["name"], DEFAULT_TOOL_NAME);
    assert_eq!(response["result"]["tools"][0]["inputSchema"]["type"], "object");

    writer.shutdown().await.unwrap();
    drop(writer);
    drop(lines);
    handle.await.unwrap().unwrap();
}
