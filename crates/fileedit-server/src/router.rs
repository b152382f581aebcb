// ABOUTME: Axum router wiring the REST tool endpoints, health, and the JSON-RPC endpoint
// ABOUTME: Applies request tracing and the request timeout to every route
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use fileedit_mcp::transport::http::{apply_layers, mcp_routes};

use crate::health;
use crate::state::SharedState;
use crate::tools;

/// Build the application router with all endpoints
///
/// Routes:
/// - `POST /list_files`, `POST /read_file`, `POST /edit_file`: one tool each
/// - `GET /health`: Server identity and tool names
/// - `POST /mcp`: JSON-RPC 2.0 over the same tool processor
pub fn build(state: SharedState) -> Router {
    let limits = state.limits;
    let mcp = mcp_routes(Arc::clone(&state.server), limits.max_body_bytes);

    let rest = Router::new()
        .route("/list_files", any(tools::handle_list_files))
        .route("/read_file", any(tools::handle_read_file))
        .route("/edit_file", any(tools::handle_edit_file))
        .route("/health", get(health::handle))
        .with_state(state);

    apply_layers(rest.merge(mcp), limits)
}
