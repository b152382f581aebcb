// ABOUTME: Server state shared by every REST handler
// ABOUTME: Wraps the MCP tool processor and the HTTP limits it is served with
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use fileedit_mcp::transport::http::HttpLimits;
use fileedit_mcp::McpServer;

/// Shared server state handle
pub type SharedState = Arc<ServerState>;

/// Immutable state: the REST endpoints and `/mcp` share one processor
pub struct ServerState {
    /// Tool processor every endpoint delegates to
    pub server: Arc<McpServer>,
    /// Body and time bounds
    pub limits: HttpLimits,
}

impl ServerState {
    /// Create server state over the given processor
    pub const fn new(server: Arc<McpServer>, limits: HttpLimits) -> Self {
        Self { server, limits }
    }
}
