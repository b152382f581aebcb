// ABOUTME: GET /health handler reporting server identity and registered tools
// ABOUTME: Always 200 while the process is serving requests
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fileedit_mcp::protocol::{SERVER_NAME, SERVER_VERSION};
use serde::Serialize;

use crate::state::SharedState;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Server name
    pub server: &'static str,
    /// Server version
    pub version: &'static str,
    /// Registered tool names
    pub tools: Vec<String>,
}

/// Handle GET /health
pub async fn handle(State(state): State<SharedState>) -> impl IntoResponse {
    let tools = state
        .server
        .tool_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();

    Json(HealthResponse {
        status: "ok",
        server: SERVER_NAME,
        version: SERVER_VERSION,
        tools,
    })
}
