// ABOUTME: MCP tool processor that routes JSON-RPC requests to protocol handlers and tools
// ABOUTME: Implements initialize, tools/list, and tools/call over a shared FileOperationService
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use fileedit::errors::ErrorDetail;
use fileedit::types::FileOperationService;
use serde::Serialize;
use serde_json::value::RawValue;
use tracing::debug;

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ToolDefinition, ToolsListResult, JSONRPC_VERSION,
};
use crate::tools::{ToolOutcome, ToolRegistry};

/// Arguments used when a `tools/call` omits them
const EMPTY_ARGUMENTS: &str = "{}";

/// MCP server that dispatches JSON-RPC requests to the appropriate handler
///
/// Holds no per-request state, so one instance is shared by every
/// transport and connection. Transport layers feed decoded requests into
/// [`handle_request`](Self::handle_request) and send the returned responses.
pub struct McpServer {
    service: Arc<dyn FileOperationService>,
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a server over the given file service and tool registry
    pub fn new(service: Arc<dyn FileOperationService>, tools: ToolRegistry) -> Self {
        Self { service, tools }
    }

    /// Registered tool definitions, in `tools/list` order
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.list_definitions()
    }

    /// Route a JSON-RPC request and build the response envelope
    ///
    /// Every request gets exactly one response carrying its id, including
    /// requests without an id (answered with a null id).
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let outcome = self.process(&request).await;
        if let Err(detail) = &outcome {
            debug!(method = %request.method, code = detail.code, error = %detail, "Request failed");
        }
        JsonRpcResponse::from_outcome(request.id, outcome)
    }

    /// Route a JSON-RPC request to its handler
    ///
    /// `Ok` results travel in a success envelope even when the tool itself
    /// failed (`isError: true`); `Err` becomes a JSON-RPC error.
    pub async fn process(&self, request: &JsonRpcRequest) -> Result<CallToolResult, ErrorDetail> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(ErrorDetail::invalid_request(format!(
                "Unsupported JSON-RPC version: '{}'",
                request.jsonrpc
            )));
        }
        if request.method.is_empty() {
            return Err(ErrorDetail::invalid_request("Missing method"));
        }

        match request.method.as_str() {
            "initialize" => Self::handle_initialize(request.params.as_deref()),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params.as_deref()).await,
            method => {
                debug!(method, "Unknown MCP method");
                Err(ErrorDetail::method_not_found(method))
            }
        }
    }

    /// Invoke a tool by name with raw arguments
    ///
    /// Missing arguments are treated as an empty object. Argument decoding
    /// and validation failures are returned as `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<&RawValue>,
    ) -> Result<ToolOutcome, ErrorDetail> {
        let empty;
        let arguments = match arguments {
            Some(raw) => raw,
            None => {
                empty = RawValue::from_string(EMPTY_ARGUMENTS.to_owned())
                    .map_err(|e| ErrorDetail::internal(e.to_string()))?;
                &*empty
            }
        };

        debug!(tool = name, "Dispatching tool call");
        self.tools
            .execute(name, self.service.as_ref(), arguments)
            .await
    }

    /// Handle `initialize`: log client info and return the fixed descriptor
    fn handle_initialize(params: Option<&RawValue>) -> Result<CallToolResult, ErrorDetail> {
        let init = params.and_then(|p| serde_json::from_str::<InitializeParams>(p.get()).ok());
        if let Some(init) = init {
            debug!(
                client = %init.client_info.name,
                version = ?init.client_info.version,
                protocol = %init.protocol_version,
                "MCP client connected"
            );
        }

        text_result(&InitializeResult::default())
    }

    /// Handle `tools/list`: return all registered tool definitions
    fn handle_tools_list(&self) -> Result<CallToolResult, ErrorDetail> {
        text_result(&ToolsListResult {
            tools: self.tools.list_definitions(),
        })
    }

    /// Handle `tools/call`: decode the call envelope and dispatch
    async fn handle_tools_call(
        &self,
        params: Option<&RawValue>,
    ) -> Result<CallToolResult, ErrorDetail> {
        let Some(params) = params else {
            return Err(ErrorDetail::invalid_params("Missing params for tools/call"));
        };
        let call: CallToolParams = serde_json::from_str(params.get()).map_err(|e| {
            ErrorDetail::invalid_params(format!("Invalid tools/call params: {e}"))
        })?;

        let outcome = self.call_tool(&call.name, call.arguments.as_deref()).await?;
        Ok(outcome.into_result())
    }
}

/// Serialize a descriptor into the text of a single content block
fn text_result<T: Serialize>(value: &T) -> Result<CallToolResult, ErrorDetail> {
    serde_json::to_string(value)
        .map(CallToolResult::text)
        .map_err(|e| ErrorDetail::internal(format!("Serialization error: {e}")))
}
