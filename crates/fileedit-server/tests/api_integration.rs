// ABOUTME: Integration tests for the fileedit-server REST API endpoints
// ABOUTME: Exercises tool endpoints, health, framing rejections, and /mcp against a temp directory
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use fileedit::{LocalFileService, ServerConfig};
use fileedit_mcp::transport::http::HttpLimits;
use fileedit_mcp::{build_tool_registry, McpServer};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use fileedit_server::router;
use fileedit_server::state::ServerState;

const LIMITS: HttpLimits = HttpLimits {
    max_body_bytes: 4096,
    request_timeout: Duration::from_secs(5),
};

/// Build a test app over a fresh temporary directory
fn test_app() -> (axum::Router, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let config = ServerConfig::new(dir.path().to_path_buf());
    let service = Arc::new(LocalFileService::new(&config));
    let server = Arc::new(McpServer::new(service, build_tool_registry()));
    let app = router::build(Arc::new(ServerState::new(server, LIMITS)));
    (app, dir)
}

/// Build a JSON POST request
fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("build request")
}

/// Send a request and parse the response body as JSON
async fn send_and_parse(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn text(json: &Value) -> &str {
    json["content"][0]["text"].as_str().expect("text content")
}

// ============================================================================
// Health Endpoint
// ============================================================================

#[tokio::test]
async fn health_reports_server_and_tools() {
    let (app, _dir) = test_app();

    let (status, json) = send_and_parse(
        app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("build request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["server"], "file-editing-server");
    assert_eq!(
        json["tools"],
        json!(["list_files", "read_file", "edit_file"])
    );
}

// ============================================================================
// Tool Endpoints
// ============================================================================

#[tokio::test]
async fn list_files_on_empty_directory() {
    let (app, _dir) = test_app();
    let (status, json) = send_and_parse(app, post("/list_files", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isError"], false);
    assert_eq!(text(&json), "Total files: 0");
}

#[tokio::test]
async fn read_whole_file() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("test.txt"), "Line 1\nLine 2\nLine 3").expect("write");

    let (status, json) =
        send_and_parse(app, post("/read_file", &json!({"name": "test.txt"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text(&json),
        "File: test.txt (3 lines)\n\nLine 1\nLine 2\nLine 3"
    );
}

#[tokio::test]
async fn read_past_end_of_file_shows_empty_range() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("five.txt"), "1\n2\n3\n4\n5\n").expect("write");

    let (status, json) = send_and_parse(
        app,
        post(
            "/read_file",
            &json!({"name": "five.txt", "start_line": 10, "end_line": 12}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&json), "File: five.txt (lines 10-9 of 5 total)\n\n");
}

#[tokio::test]
async fn missing_file_takes_not_found_status() {
    let (app, _dir) = test_app();
    let (status, json) =
        send_and_parse(app, post("/read_file", &json!({"name": "nope.txt"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["isError"], true);
    assert_eq!(text(&json), "Error: File not found: nope.txt");
}

#[tokio::test]
async fn undecodable_file_takes_bad_request_status() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("bin.dat"), [0xff, 0xfe, 0x00]).expect("write");

    let (status, json) = send_and_parse(app, post("/read_file", &json!({"name": "bin.dat"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["isError"], true);
}

#[tokio::test]
async fn invalid_arguments_return_error_body() {
    let (app, _dir) = test_app();
    let (status, json) = send_and_parse(
        app,
        post("/read_file", &json!({"name": "a.txt", "start_line": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], -32602);
    assert!(json["error"]["data"]["param_issues"]["start_line"].is_string());
    assert!(json["error"]["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn edit_creates_file_then_lists_it() {
    let (app, dir) = test_app();

    let (status, json) = send_and_parse(
        app.clone(),
        post(
            "/edit_file",
            &json!({"name": "new.txt", "append": "a\nb", "create_if_missing": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text(&json),
        "File edited successfully: new.txt\nLines modified: 2\nTotal lines: 2\nFile created: true"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("new.txt")).expect("read back"),
        "a\nb\n"
    );

    let (_, json) = send_and_parse(app, post("/list_files", &json!({}))).await;
    let listing = text(&json);
    assert!(listing.starts_with("Files in directory:\n\nname: new.txt, modified: "));
    assert!(listing.ends_with(", lines: 2\n\nTotal files: 1"));
}

#[tokio::test]
async fn out_of_range_edit_is_rejected_without_writing() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("one.txt"), "only\n").expect("write");

    let (status, json) = send_and_parse(
        app,
        post(
            "/edit_file",
            &json!({"name": "one.txt", "edits": [{"line": 5, "operation": "delete"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["isError"], true);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("one.txt")).expect("read back"),
        "only\n"
    );
}

// ============================================================================
// Framing
// ============================================================================

#[tokio::test]
async fn get_on_tool_endpoint_is_method_not_allowed() {
    let (app, _dir) = test_app();
    let (status, json) = send_and_parse(
        app,
        Request::builder()
            .uri("/read_file")
            .body(Body::empty())
            .expect("build request"),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["error"]["code"], -32600);
}

#[tokio::test]
async fn wrong_content_type_is_unsupported() {
    let (app, _dir) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/list_files")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("{}"))
        .expect("build request");
    let (status, _) = send_and_parse(app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, _dir) = test_app();
    let body = json!({"name": "big.txt", "append": "x".repeat(8192)});
    let (status, json) = send_and_parse(app, post("/edit_file", &body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].is_object());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, _dir) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/read_file")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .expect("build request");
    let (status, json) = send_and_parse(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], -32700);
}

// ============================================================================
// JSON-RPC Endpoint
// ============================================================================

#[tokio::test]
async fn mcp_endpoint_shares_the_processor() {
    let (app, dir) = test_app();
    std::fs::write(dir.path().join("a.txt"), "hello\n").expect("write");

    let (status, json) = send_and_parse(
        app,
        post(
            "/mcp",
            &json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "read_file", "arguments": {"name": "a.txt"}}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 1);
    assert_eq!(
        json["result"]["content"][0]["text"],
        "File: a.txt (1 lines)\n\nhello\n"
    );
}
