// ABOUTME: HTTP transport serving JSON-RPC requests at POST /mcp via axum
// ABOUTME: Enforces method, content type, body size, and strict envelope decoding before dispatch
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use fileedit::errors::ErrorDetail;
use fileedit::types::ServerError;
use fileedit::ServerConfig;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::server::McpServer;
use crate::transport::McpTransport;

/// Body and time bounds applied to every HTTP request
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Time allowed to handle one request before answering 408
    pub request_timeout: Duration,
}

impl HttpLimits {
    /// Take the limits from the shared server configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes(),
            request_timeout: config.request_timeout,
        }
    }
}

/// MCP transport over HTTP using axum
///
/// Exposes a single endpoint at `/mcp` that accepts JSON-RPC messages by
/// POST. Protocol and tool errors are returned with status 200; only
/// framing failures use 4xx statuses.
pub struct HttpTransport {
    host: String,
    port: u16,
    limits: HttpLimits,
}

impl HttpTransport {
    /// Create an HTTP transport bound to the given host and port
    pub const fn new(host: String, port: u16, limits: HttpLimits) -> Self {
        Self { host, port, limits }
    }
}

#[async_trait]
impl McpTransport for HttpTransport {
    async fn serve(self, server: Arc<McpServer>) -> Result<(), ServerError> {
        let app = router(server, self.limits);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::io(format!("Failed to bind {addr}"), &e))?;

        info!(address = %addr, "HTTP transport listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::io("HTTP server error", &e))?;

        Ok(())
    }
}

/// Resolve when the process receives Ctrl-C
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

// ============================================================================
// Routing
// ============================================================================

#[derive(Clone)]
struct McpHttpState {
    server: Arc<McpServer>,
    max_body_bytes: usize,
}

/// Unlayered `/mcp` route, for merging into a larger router
pub fn mcp_routes(server: Arc<McpServer>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/mcp", any(handle_mcp))
        .with_state(McpHttpState {
            server,
            max_body_bytes,
        })
}

/// Complete router for the standalone MCP HTTP transport
pub fn router(server: Arc<McpServer>, limits: HttpLimits) -> Router {
    apply_layers(mcp_routes(server, limits.max_body_bytes), limits)
}

/// Add request tracing and the request timeout
pub fn apply_layers(router: Router, limits: HttpLimits) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// JSON-RPC envelope as accepted over HTTP: unknown members are rejected
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictEnvelope {
    #[serde(default)]
    jsonrpc: String,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    method: String,
    #[serde(default)]
    params: Option<Box<RawValue>>,
}

impl From<StrictEnvelope> for JsonRpcRequest {
    fn from(envelope: StrictEnvelope) -> Self {
        Self {
            jsonrpc: envelope.jsonrpc,
            id: envelope.id,
            method: envelope.method,
            params: envelope.params,
        }
    }
}

/// Handle a request to `/mcp`
async fn handle_mcp(State(state): State<McpHttpState>, request: Request) -> Response {
    let body = match read_json_body(request, state.max_body_bytes).await {
        Ok(body) => body,
        Err(rejection) => return rejection.into_jsonrpc_response(),
    };

    let envelope: StrictEnvelope = match decode_strict(&body) {
        Ok(envelope) => envelope,
        Err(rejection) => return rejection.into_jsonrpc_response(),
    };

    debug!(method = %envelope.method, "Handling HTTP MCP request");
    let response = state.server.handle_request(envelope.into()).await;
    (StatusCode::OK, Json(response)).into_response()
}

// ============================================================================
// Framing
// ============================================================================

/// Transport-level rejection raised before a request reaches the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Anything other than POST
    MethodNotAllowed(Method),
    /// Missing or non-JSON `Content-Type`
    UnsupportedMediaType(Option<String>),
    /// Body larger than the configured limit
    PayloadTooLarge {
        /// Limit in bytes
        limit: usize,
    },
    /// The body stream failed before completing
    BodyRead(String),
    /// Body is not valid JSON for the expected shape
    Malformed(String),
}

impl FramingError {
    /// HTTP status for this rejection
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BodyRead(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Catalog error describing this rejection
    pub fn detail(&self) -> ErrorDetail {
        match self {
            Self::MethodNotAllowed(_)
            | Self::UnsupportedMediaType(_)
            | Self::PayloadTooLarge { .. } => ErrorDetail::invalid_request(self.to_string()),
            Self::BodyRead(_) | Self::Malformed(_) => ErrorDetail::parse_error(self.to_string()),
        }
    }

    /// Response with this status and a JSON-RPC error envelope (`id: null`)
    pub fn into_jsonrpc_response(self) -> Response {
        warn!(status = %self.status(), reason = %self, "Rejected HTTP request");
        let body = JsonRpcResponse::from_detail(Value::Null, &self.detail());
        self.respond(Json(body))
    }

    /// Response with this status and the given body
    pub fn respond(&self, body: impl IntoResponse) -> Response {
        let mut response = (self.status(), body).into_response();
        if matches!(self, Self::MethodNotAllowed(_)) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed(method) => write!(f, "Method {method} not allowed, use POST"),
            Self::UnsupportedMediaType(Some(content_type)) => {
                write!(f, "Content type '{content_type}' is not {JSON_MIME}")
            }
            Self::UnsupportedMediaType(None) => write!(f, "Missing content type, use {JSON_MIME}"),
            Self::PayloadTooLarge { limit } => {
                write!(f, "Request body exceeds the {limit} byte limit")
            }
            Self::BodyRead(reason) => write!(f, "Failed to read request body: {reason}"),
            Self::Malformed(reason) => write!(f, "Invalid JSON body: {reason}"),
        }
    }
}

impl std::error::Error for FramingError {}

/// Check method and content type, then read at most `limit` bytes of body
pub async fn read_json_body(request: Request, limit: usize) -> Result<Bytes, FramingError> {
    let (parts, body) = request.into_parts();

    if parts.method != Method::POST {
        return Err(FramingError::MethodNotAllowed(parts.method));
    }

    if !is_json_content_type(&parts.headers) {
        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        return Err(FramingError::UnsupportedMediaType(content_type));
    }

    if let Some(length) = content_length(&parts.headers) {
        if length > u64::try_from(limit).unwrap_or(u64::MAX) {
            return Err(FramingError::PayloadTooLarge { limit });
        }
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(FramingError::PayloadTooLarge { limit })
        }
        Err(e) => Err(FramingError::BodyRead(e.to_string())),
    }
}

/// Decode a JSON body, mapping failures to a 400 framing error
pub fn decode_strict<T: DeserializeOwned>(body: &[u8]) -> Result<T, FramingError> {
    serde_json::from_slice(body).map_err(|e| FramingError::Malformed(e.to_string()))
}

const JSON_MIME: &str = "application/json";

/// `application/json`, with or without parameters such as charset
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JSON_MIME))
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
