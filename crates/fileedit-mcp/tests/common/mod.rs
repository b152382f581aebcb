// ABOUTME: Shared fixtures for fileedit-mcp integration tests
// ABOUTME: Provides a scripted FileOperationService double and server builders
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fileedit::errors::ErrorDetail;
use fileedit::types::{
    EditFileRequest, EditFileResponse, FileInfo, FileOperationService, ListFilesRequest,
    ListFilesResponse, ReadFileRequest, ReadFileResponse,
};
use fileedit::{LocalFileService, ServerConfig};
use fileedit_mcp::protocol::{CallToolResult, JsonRpcRequest, JsonRpcResponse};
use fileedit_mcp::{build_tool_registry, McpServer};
use serde_json::Value;

/// Service double returning scripted results and recording calls
pub struct StubService {
    pub files: Vec<FileInfo>,
    pub read: Result<ReadFileResponse, ErrorDetail>,
    pub edit: Result<EditFileResponse, ErrorDetail>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for StubService {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            read: Err(ErrorDetail::internal("read not scripted")),
            edit: Err(ErrorDetail::internal("edit not scripted")),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubService {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl FileOperationService for StubService {
    async fn list_files(
        &self,
        _request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, ErrorDetail> {
        self.record("list".to_owned());
        Ok(ListFilesResponse {
            files: self.files.clone(),
        })
    }

    async fn read_file(&self, request: &ReadFileRequest) -> Result<ReadFileResponse, ErrorDetail> {
        self.record(format!("read:{}", request.name));
        self.read.clone()
    }

    async fn edit_file(&self, request: &EditFileRequest) -> Result<EditFileResponse, ErrorDetail> {
        self.record(format!("edit:{}", request.name));
        self.edit.clone()
    }
}

pub fn file_info(name: &str, lines: i64) -> FileInfo {
    FileInfo {
        name: name.to_owned(),
        size: 42,
        modified: Utc
            .with_ymd_and_hms(2023, 1, 1, 12, 0, 0)
            .single()
            .expect("valid date"),
        lines,
    }
}

pub fn stub_server(stub: StubService) -> (Arc<McpServer>, Arc<StubService>) {
    let stub = Arc::new(stub);
    let service: Arc<dyn FileOperationService> = stub.clone();
    (
        Arc::new(McpServer::new(service, build_tool_registry())),
        stub,
    )
}

pub fn local_server(dir: &Path) -> Arc<McpServer> {
    let config = ServerConfig::new(dir.to_path_buf());
    let service = Arc::new(LocalFileService::new(&config));
    Arc::new(McpServer::new(service, build_tool_registry()))
}

pub fn call(id: i64, tool: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(
        Value::from(id),
        "tools/call",
        Some(serde_json::json!({ "name": tool, "arguments": arguments })),
    )
}

/// Tool result carried in a success response
pub fn tool_result(response: &JsonRpcResponse) -> CallToolResult {
    assert!(
        response.error.is_none(),
        "unexpected error: {:?}",
        response.error
    );
    serde_json::from_value(response.result.clone().expect("result")).expect("tool result")
}
