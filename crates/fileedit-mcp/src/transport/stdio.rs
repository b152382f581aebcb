// ABOUTME: Stdio transport reading newline-delimited JSON-RPC from stdin and writing to stdout
// ABOUTME: Processes one line at a time so responses come out in request order
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use async_trait::async_trait;
use fileedit::errors::ErrorDetail;
use fileedit::types::ServerError;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, FALLBACK_RESPONSE};
use crate::server::McpServer;
use crate::transport::McpTransport;

/// MCP transport over stdin/stdout using newline-delimited JSON-RPC
///
/// Each line on stdin is expected to be a complete JSON-RPC message.
/// Responses are written as single lines to stdout. Logs go to stderr
/// to avoid polluting the protocol channel.
pub struct StdioTransport;

#[async_trait]
impl McpTransport for StdioTransport {
    async fn serve(self, server: Arc<McpServer>) -> Result<(), ServerError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        debug!("Stdio transport ready, waiting for JSON-RPC messages on stdin");
        run(&server, stdin, stdout).await
    }
}

/// Serve newline-delimited JSON-RPC from `reader` to `writer` until EOF
///
/// Requests are handled strictly one after another. A line that fails to
/// parse produces a parse-error response and the loop moves on; only I/O
/// failures on the streams end it early.
pub async fn run<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| ServerError::io("stdin read failed", &e))?;
        if read == 0 {
            break;
        }

        if let Some(response) = handle_line(server, &line).await {
            write_response(&mut writer, &response).await?;
        }
    }

    debug!("Input closed, shutting down stdio transport");
    Ok(())
}

/// Handle one raw input line, returning `None` for blank lines
pub async fn handle_line(server: &McpServer, line: &[u8]) -> Option<JsonRpcResponse> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice::<JsonRpcRequest>(line) {
        Ok(request) => {
            debug!(method = %request.method, "Handling MCP request");
            Some(server.handle_request(request).await)
        }
        Err(e) => {
            error!(error = %e, "Failed to parse JSON-RPC request");
            Some(JsonRpcResponse::from_detail(
                recover_id(line),
                &ErrorDetail::parse_error(e.to_string()),
            ))
        }
    }
}

/// Best-effort extraction of `id` from a line that did not parse as a request
fn recover_id(raw: &[u8]) -> Value {
    #[derive(Deserialize)]
    struct IdProbe {
        #[serde(default)]
        id: Value,
    }

    serde_json::from_slice::<IdProbe>(raw).map_or(Value::Null, |probe| probe.id)
}

/// Serialize and write a JSON-RPC response as a single line
///
/// Falls back to a fixed internal-error line if the response cannot be
/// serialized.
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let json = serde_json::to_string(response).unwrap_or_else(|e| {
        error!(error = %e, "JSON serialization failed, sending fallback response");
        FALLBACK_RESPONSE.to_owned()
    });

    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ServerError::io("stdout write failed", &e))?;

    writer
        .write_all(b"\n")
        .await
        .map_err(|e| ServerError::io("stdout newline write failed", &e))?;

    writer
        .flush()
        .await
        .map_err(|e| ServerError::io("stdout flush failed", &e))?;

    Ok(())
}
