// ABOUTME: MCP JSON-RPC protocol types for request/response handling
// ABOUTME: Defines wire format for initialize, tools/list, tools/call, tool definitions, and tool results
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use fileedit::errors::{to_jsonrpc_error, ErrorDetail};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

pub use fileedit::errors::{
    JsonRpcError, JsonRpcErrorData, FILESYSTEM_ERROR, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, LOCK_FAILED, METHOD_NOT_FOUND, PARSE_ERROR,
};

/// MCP protocol version supported by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported during MCP handshake
pub const SERVER_NAME: &str = "file-editing-server";

/// Server version reported during MCP handshake
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server description reported during MCP handshake
pub const SERVER_DESCRIPTION: &str =
    "Lists, reads, and applies line-based edits to files in a single working directory";

/// The only JSON-RPC version accepted
pub const JSONRPC_VERSION: &str = "2.0";

/// Pre-serialized response used when a response cannot be serialized at all
pub const FALLBACK_RESPONSE: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

// ============================================================================
// JSON-RPC Messages
// ============================================================================

/// Incoming JSON-RPC request from MCP client
///
/// `jsonrpc` and `method` default to empty so a structurally valid object
/// missing them is reported as an invalid request rather than a parse error.
/// `params` stays raw until the method has been resolved.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version marker, must be "2.0"
    #[serde(default)]
    pub jsonrpc: String,
    /// Request identifier, echoed verbatim (null when absent)
    #[serde(default)]
    pub id: Value,
    /// Method name
    #[serde(default)]
    pub method: String,
    /// Method parameters, undecoded
    #[serde(default)]
    pub params: Option<Box<RawValue>>,
}

impl JsonRpcRequest {
    /// Build a "2.0" request from already-decoded parameters
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            method: method.into(),
            params: params.and_then(|p| serde_json::value::to_raw_value(&p).ok()),
        }
    }
}

/// Outgoing JSON-RPC response to MCP client
///
/// Exactly one of `result` and `error` is set by the constructors.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Matching request identifier
    pub id: Value,
    /// Success payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response with the given result
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response from a wire error object
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Build an error response from a catalog error
    pub fn from_detail(id: Value, detail: &ErrorDetail) -> Self {
        Self::error(id, to_jsonrpc_error(detail))
    }

    /// Build a response from a processor outcome
    ///
    /// A result that cannot be converted to JSON becomes an internal error.
    pub fn from_outcome(id: Value, outcome: Result<CallToolResult, ErrorDetail>) -> Self {
        match outcome {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => Self::success(id, value),
                Err(e) => Self::from_detail(
                    id,
                    &ErrorDetail::internal(format!("Result serialization error: {e}")),
                ),
            },
            Err(detail) => Self::from_detail(id, &detail),
        }
    }
}

// ============================================================================
// MCP Initialize
// ============================================================================

/// Parameters a client sends with `initialize`
///
/// Only used for logging; decoding failures are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitializeParams {
    /// Protocol version the client speaks
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Client identification
    #[serde(rename = "clientInfo")]
    pub client_info: ClientInfo,
}

/// Client identification
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    pub version: Option<String>,
}

/// Descriptor returned by `initialize`
#[derive(Debug, Serialize)]
pub struct InitializeResult {
    /// Protocol version the server supports
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
    /// Server identification
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_owned(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {},
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_owned(),
                version: SERVER_VERSION.to_owned(),
                description: SERVER_DESCRIPTION.to_owned(),
            },
        }
    }
}

/// Server identification
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// What the server does
    pub description: String,
}

/// Server capability declarations
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    /// Tool support (presence signals tools are available)
    pub tools: ToolsCapability,
}

/// Marker type indicating the server supports MCP tools
#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

// ============================================================================
// MCP Tools
// ============================================================================

/// Behavioral hints attached to a tool definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Tool never modifies files
    pub read_only_hint: bool,
    /// Tool may overwrite or remove existing content
    pub destructive_hint: bool,
}

/// Tool definition exposed via `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Human-readable tool description
    pub description: String,
    /// JSON Schema describing the tool's arguments
    #[serde(rename = "argumentsSchema")]
    pub arguments_schema: Value,
    /// JSON Schema describing the tool's structured response
    #[serde(rename = "responseSchema")]
    pub response_schema: Value,
    /// Behavioral hints
    pub annotations: ToolAnnotations,
}

/// Result of a `tools/list` call
#[derive(Debug, Serialize)]
pub struct ToolsListResult {
    /// Available tool definitions
    pub tools: Vec<ToolDefinition>,
}

/// Parameters for a `tools/call` request
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to invoke
    pub name: String,
    /// Tool arguments, decoded by the tool itself
    #[serde(default)]
    pub arguments: Option<Box<RawValue>>,
}

/// Result of a `tools/call` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Response content parts (never empty)
    pub content: Vec<ContentPart>,
    /// Whether this result represents an error
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// A content part within a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Content type (always "text" for now)
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text content
    pub text: String,
}

impl CallToolResult {
    /// Build a successful text result
    pub fn text(content: String) -> Self {
        Self {
            content: vec![ContentPart {
                content_type: "text".to_owned(),
                text: content,
            }],
            is_error: false,
        }
    }

    /// Build an error result with the given message
    pub fn error(message: String) -> Self {
        Self {
            content: vec![ContentPart {
                content_type: "text".to_owned(),
                text: message,
            }],
            is_error: true,
        }
    }

    /// Text of the first content part
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", |c| c.text.as_str())
    }
}
