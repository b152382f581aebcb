// ABOUTME: REST handlers exposing each tool at its own POST endpoint
// ABOUTME: Body is the tool's argument object; the response is the same tool result as tools/call
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fileedit::errors::{to_error_response, ErrorDetail};
use fileedit_mcp::transport::http::{decode_strict, read_json_body, FramingError};
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::state::{ServerState, SharedState};

/// Handle POST /list_files
pub async fn handle_list_files(State(state): State<SharedState>, request: Request) -> Response {
    handle_tool(&state, "list_files", request).await
}

/// Handle POST /read_file
pub async fn handle_read_file(State(state): State<SharedState>, request: Request) -> Response {
    handle_tool(&state, "read_file", request).await
}

/// Handle POST /edit_file
pub async fn handle_edit_file(State(state): State<SharedState>, request: Request) -> Response {
    handle_tool(&state, "edit_file", request).await
}

/// Run one tool for a REST request
///
/// Framing failures and invalid arguments answer with an `{error}` body.
/// Tool outcomes answer with the tool result; a failed outcome takes the
/// HTTP status of its error.
async fn handle_tool(state: &ServerState, tool: &str, request: Request) -> Response {
    let body = match read_json_body(request, state.limits.max_body_bytes).await {
        Ok(body) => body,
        Err(rejection) => return framing_response(&rejection),
    };
    let arguments: Box<RawValue> = match decode_strict(&body) {
        Ok(arguments) => arguments,
        Err(rejection) => return framing_response(&rejection),
    };

    debug!(tool, "Handling REST tool request");
    match state.server.call_tool(tool, Some(&*arguments)).await {
        Ok(outcome) => {
            let status = outcome
                .error()
                .map_or(StatusCode::OK, status_for);
            (status, Json(outcome.into_result())).into_response()
        }
        Err(detail) => {
            warn!(tool, code = detail.code, error = %detail, "Rejected tool arguments");
            (status_for(&detail), error_body(&detail)).into_response()
        }
    }
}

fn framing_response(rejection: &FramingError) -> Response {
    warn!(status = %rejection.status(), reason = %rejection, "Rejected REST request");
    rejection.respond(error_body(&rejection.detail()))
}

fn error_body(detail: &ErrorDetail) -> Response {
    to_error_response(Some(detail)).map_or_else(
        || StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        |body| Json(body).into_response(),
    )
}

fn status_for(detail: &ErrorDetail) -> StatusCode {
    StatusCode::from_u16(detail.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
