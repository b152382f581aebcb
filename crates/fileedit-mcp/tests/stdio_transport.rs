// ABOUTME: Integration tests for the newline-delimited stdio transport
// ABOUTME: Drives the loop with in-memory streams, including malformed and non-UTF-8 lines
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

mod common;

use fileedit::errors::{INVALID_REQUEST, PARSE_ERROR};
use fileedit_mcp::protocol::JsonRpcResponse;
use fileedit_mcp::transport::stdio::run;
use serde_json::Value;
use tempfile::TempDir;

use common::{local_server, stub_server, tool_result, StubService};

/// Run the loop over `input` and parse each output line
async fn drive(input: &[u8]) -> Vec<JsonRpcResponse> {
    let (server, _) = stub_server(StubService::default());
    drive_with(&server, input).await
}

async fn drive_with(server: &fileedit_mcp::McpServer, input: &[u8]) -> Vec<JsonRpcResponse> {
    let mut output = Vec::new();
    run(server, input, &mut output).await.expect("stdio loop");
    let text = String::from_utf8(output).expect("utf-8 output");
    assert!(text.is_empty() || text.ends_with('\n'));
    text.lines()
        .map(|line| serde_json::from_str(line).expect("response json"))
        .collect()
}

#[tokio::test]
async fn interleaved_valid_and_malformed_lines_keep_order() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        "\n",
        "this is not json\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
        "   \t \n",
        r#"{"jsonrpc":"2.0","id":3,"method":"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":4,"method":"nope"}"#,
        "\n",
    );

    let responses = drive(input.as_bytes()).await;
    assert_eq!(responses.len(), 5);

    assert_eq!(responses[0].id, Value::from(1));
    assert!(responses[0].result.is_some());

    assert_eq!(responses[1].id, Value::Null);
    assert_eq!(
        responses[1].error.as_ref().expect("error").code,
        PARSE_ERROR
    );

    assert_eq!(responses[2].id, Value::from(2));
    assert!(responses[2].result.is_some());

    assert_eq!(responses[3].id, Value::Null);
    assert_eq!(
        responses[3].error.as_ref().expect("error").code,
        PARSE_ERROR
    );

    assert_eq!(responses[4].id, Value::from(4));
    assert!(responses[4].error.is_some());
}

#[tokio::test]
async fn parse_error_echoes_recoverable_id() {
    let responses = drive(b"{\"jsonrpc\":\"2.0\",\"id\":\"req-7\",\"method\":[1]}\n").await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].id, Value::from("req-7"));
    assert_eq!(
        responses[0].error.as_ref().expect("error").code,
        PARSE_ERROR
    );
}

#[tokio::test]
async fn invalid_utf8_only_affects_its_own_line() {
    let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"\xff\"}\n".to_vec();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"initialize\"}\n");

    let responses = drive(&input).await;
    assert_eq!(responses.len(), 2);
    assert_eq!(
        responses[0].error.as_ref().expect("error").code,
        PARSE_ERROR
    );
    assert_eq!(responses[1].id, Value::from(2));
    assert!(responses[1].result.is_some());
}

#[tokio::test]
async fn envelope_violations_keep_the_id() {
    let responses = drive(b"{\"jsonrpc\":\"1.0\",\"id\":5,\"method\":\"initialize\"}\n").await;
    assert_eq!(responses[0].id, Value::from(5));
    assert_eq!(
        responses[0].error.as_ref().expect("error").code,
        INVALID_REQUEST
    );
}

#[tokio::test]
async fn last_line_without_newline_is_handled() {
    let responses = drive(br#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).await;
    assert_eq!(responses.len(), 1);
}

#[tokio::test]
async fn empty_input_produces_no_output() {
    assert!(drive(b"").await.is_empty());
    assert!(drive(b"\n\n  \n").await.is_empty());
}

#[tokio::test]
async fn edit_then_read_against_a_real_directory() {
    let dir = TempDir::new().expect("tempdir");
    let server = local_server(dir.path());

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"edit_file","arguments":{"name":"notes.txt","append":"alpha\nbeta\ngamma","create_if_missing":true}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"read_file","arguments":{"name":"notes.txt","start_line":2,"end_line":3}}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"read_file","arguments":{"name":"absent.txt"}}}"#,
        "\n",
    );

    let responses = drive_with(&server, input.as_bytes()).await;
    assert_eq!(responses.len(), 3);

    let edit = tool_result(&responses[0]);
    let edit_text = edit.first_text();
    assert!(!edit.is_error, "{edit_text}");
    assert!(edit_text.starts_with("File edited successfully: notes.txt\n"));
    assert!(edit_text.ends_with("File created: true"));

    let read = tool_result(&responses[1]);
    assert_eq!(
        read.first_text(),
        "File: notes.txt (lines 2-3 of 3 total)\n\nbeta\ngamma"
    );

    let missing = tool_result(&responses[2]);
    assert!(missing.is_error);
    assert_eq!(missing.first_text(), "Error: File not found: absent.txt");
}
