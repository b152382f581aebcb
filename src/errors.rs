// ABOUTME: Error catalog mapping protocol and filesystem failures to their wire representations
// ABOUTME: Builds timestamped ErrorDetail values and projects them onto JSON-RPC errors and HTTP statuses
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Error Catalog
//!
//! Single source of truth for every failure that becomes visible on the wire.
//! Each [`ErrorDetail`] carries a fixed code, a human-readable message, a
//! typed [`ErrorData`] payload, and the UTC time it was created. The same
//! value can be rendered three ways:
//!
//! - as an HTTP error body via [`to_error_response`]
//! - as a JSON-RPC error object via [`to_jsonrpc_error`]
//! - as an HTTP status via [`map_error_to_http_status`]

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// Error Codes
// ============================================================================

/// JSON-RPC parse error: invalid JSON received
pub const PARSE_ERROR: i32 = -32_700;

/// JSON-RPC invalid request: envelope is not a valid request object
pub const INVALID_REQUEST: i32 = -32_600;

/// JSON-RPC method not found
pub const METHOD_NOT_FOUND: i32 = -32_601;

/// JSON-RPC invalid parameters
pub const INVALID_PARAMS: i32 = -32_602;

/// JSON-RPC internal error
pub const INTERNAL_ERROR: i32 = -32_603;

/// Application error: filesystem failure (sub-typed by [`FsErrorType`])
pub const FILESYSTEM_ERROR: i32 = -32_001;

/// Application error: could not acquire the per-file edit lock
pub const LOCK_FAILED: i32 = -32_002;

// ============================================================================
// Filesystem Sub-Types
// ============================================================================

/// Discriminator for errors that share [`FILESYSTEM_ERROR`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorType {
    /// Target file does not exist
    FileNotFound,
    /// Operating system refused access
    PermissionDenied,
    /// File exceeds the configured size limit
    FileTooLarge,
    /// File content is not valid UTF-8
    InvalidEncoding,
}

impl FsErrorType {
    /// Wire value stored under `data.type`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileNotFound => "file_not_found",
            Self::PermissionDenied => "permission_denied",
            Self::FileTooLarge => "file_too_large",
            Self::InvalidEncoding => "invalid_encoding",
        }
    }

    /// HTTP status reported for this sub-type
    pub const fn http_status(self) -> u16 {
        match self {
            Self::FileNotFound => 404,
            Self::PermissionDenied => 403,
            Self::InvalidEncoding => 400,
            Self::FileTooLarge => 413,
        }
    }
}

impl fmt::Display for FsErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Error Payload
// ============================================================================

/// Context attached to an [`ErrorDetail`], one variant per error family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorData {
    /// Envelope-level failures (parse, invalid request, unknown method, internal)
    Generic {
        /// Optional free-form explanation
        details: Option<String>,
    },
    /// Tool arguments failed to decode or validate
    InvalidParams {
        /// Summary of what was wrong
        details: String,
        /// File the arguments referred to, when known
        filename: Option<String>,
        /// Operation the arguments were meant for, when known
        operation: Option<String>,
        /// Per-field problems, keyed by argument name
        param_issues: BTreeMap<String, String>,
    },
    /// Filesystem failure with no more specific sub-type
    Filesystem {
        /// File being operated on
        filename: String,
        /// Operation that failed
        operation: String,
        /// Underlying cause
        details: String,
    },
    /// Target file does not exist
    FileNotFound {
        /// Missing file
        filename: String,
        /// Operation that needed it
        operation: String,
    },
    /// Access to the file was refused
    PermissionDenied {
        /// File being operated on
        filename: String,
        /// Operation that failed
        operation: String,
    },
    /// File exceeds the configured size limit
    FileTooLarge {
        /// Oversized file
        filename: String,
        /// Operation that was refused
        operation: String,
        /// Current size in bytes
        current_size: u64,
        /// Configured ceiling in megabytes
        max_size_mb: u64,
    },
    /// File is not valid UTF-8
    InvalidEncoding {
        /// Undecodable file
        filename: String,
        /// Operation that failed
        operation: String,
    },
    /// Per-file lock could not be acquired
    LockFailed {
        /// Contended file
        filename: String,
        /// Operation that was refused
        operation: String,
    },
}

impl ErrorData {
    /// File the error refers to, if any
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Generic { .. } => None,
            Self::InvalidParams { filename, .. } => filename.as_deref(),
            Self::Filesystem { filename, .. }
            | Self::FileNotFound { filename, .. }
            | Self::PermissionDenied { filename, .. }
            | Self::FileTooLarge { filename, .. }
            | Self::InvalidEncoding { filename, .. }
            | Self::LockFailed { filename, .. } => Some(filename.as_str()),
        }
    }

    /// Operation the error refers to, if any
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Generic { .. } => None,
            Self::InvalidParams { operation, .. } => operation.as_deref(),
            Self::Filesystem { operation, .. }
            | Self::FileNotFound { operation, .. }
            | Self::PermissionDenied { operation, .. }
            | Self::FileTooLarge { operation, .. }
            | Self::InvalidEncoding { operation, .. }
            | Self::LockFailed { operation, .. } => Some(operation.as_str()),
        }
    }

    /// Free-form explanation, without any folded-in extras
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Generic { details } => details.clone(),
            Self::InvalidParams { details, .. } | Self::Filesystem { details, .. } => {
                Some(details.clone())
            }
            Self::FileTooLarge {
                current_size,
                max_size_mb,
                ..
            } => Some(format!(
                "File size {current_size} bytes exceeds the {max_size_mb} MB limit"
            )),
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidEncoding { .. }
            | Self::LockFailed { .. } => None,
        }
    }

    /// Filesystem sub-type, for payloads that share [`FILESYSTEM_ERROR`]
    pub const fn fs_type(&self) -> Option<FsErrorType> {
        match self {
            Self::FileNotFound { .. } => Some(FsErrorType::FileNotFound),
            Self::PermissionDenied { .. } => Some(FsErrorType::PermissionDenied),
            Self::FileTooLarge { .. } => Some(FsErrorType::FileTooLarge),
            Self::InvalidEncoding { .. } => Some(FsErrorType::InvalidEncoding),
            Self::Generic { .. }
            | Self::InvalidParams { .. }
            | Self::Filesystem { .. }
            | Self::LockFailed { .. } => None,
        }
    }

    /// Flatten into the open key/value map used by HTTP error bodies
    fn to_map(&self, timestamp: &str) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(filename) = self.filename() {
            map.insert("filename".to_owned(), Value::from(filename));
        }
        if let Some(operation) = self.operation() {
            map.insert("operation".to_owned(), Value::from(operation));
        }
        if let Some(details) = self.details() {
            map.insert("details".to_owned(), Value::from(details));
        }
        if let Some(fs_type) = self.fs_type() {
            map.insert("type".to_owned(), Value::from(fs_type.as_str()));
        }
        match self {
            Self::InvalidParams { param_issues, .. } if !param_issues.is_empty() => {
                let issues = param_issues
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect();
                map.insert("param_issues".to_owned(), Value::Object(issues));
            }
            Self::FileTooLarge {
                current_size,
                max_size_mb,
                ..
            } => {
                map.insert("current_size".to_owned(), Value::from(*current_size));
                map.insert("max_size_mb".to_owned(), Value::from(*max_size_mb));
            }
            _ => {}
        }
        map.insert("timestamp".to_owned(), Value::from(timestamp));
        map
    }
}

// ============================================================================
// Error Detail
// ============================================================================

/// Structured error produced by the catalog constructors
///
/// Always carries the UTC time of construction. Serializes as
/// `{code, message, data}` where `data` is the flattened payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Numeric error code (JSON-RPC standard or application range)
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Typed context payload
    pub data: ErrorData,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl ErrorDetail {
    fn new(code: i32, message: impl Into<String>, data: ErrorData) -> Self {
        Self {
            code,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Invalid JSON received
    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(
            PARSE_ERROR,
            "Parse error",
            ErrorData::Generic {
                details: Some(details.into()),
            },
        )
    }

    /// JSON was valid but not an acceptable request envelope
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(
            INVALID_REQUEST,
            "Invalid Request",
            ErrorData::Generic {
                details: Some(details.into()),
            },
        )
    }

    /// Requested method is not implemented
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
            ErrorData::Generic { details: None },
        )
    }

    /// Parameters were missing or malformed
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::invalid_params_for(details, BTreeMap::new(), None, None)
    }

    /// Parameters failed validation, with per-field issues and file context
    pub fn invalid_params_for(
        details: impl Into<String>,
        param_issues: BTreeMap<String, String>,
        filename: Option<&str>,
        operation: Option<&str>,
    ) -> Self {
        let details = details.into();
        Self::new(
            INVALID_PARAMS,
            format!("Invalid params: {details}"),
            ErrorData::InvalidParams {
                details,
                filename: filename.map(ToOwned::to_owned),
                operation: operation.map(ToOwned::to_owned),
                param_issues,
            },
        )
    }

    /// Unexpected failure inside the server
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(
            INTERNAL_ERROR,
            "Internal error",
            ErrorData::Generic {
                details: Some(details.into()),
            },
        )
    }

    /// Filesystem failure that fits no more specific sub-type
    pub fn filesystem(filename: &str, operation: &str, details: impl Into<String>) -> Self {
        let details = details.into();
        Self::new(
            FILESYSTEM_ERROR,
            format!("Filesystem error during {operation} of '{filename}': {details}"),
            ErrorData::Filesystem {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
                details,
            },
        )
    }

    /// Target file does not exist
    pub fn file_not_found(filename: &str, operation: &str) -> Self {
        Self::new(
            FILESYSTEM_ERROR,
            format!("File not found: {filename}"),
            ErrorData::FileNotFound {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
            },
        )
    }

    /// Access to the file was refused
    pub fn permission_denied(filename: &str, operation: &str) -> Self {
        Self::new(
            FILESYSTEM_ERROR,
            format!("Permission denied: {filename}"),
            ErrorData::PermissionDenied {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
            },
        )
    }

    /// File exceeds the configured size ceiling
    pub fn file_too_large(
        filename: &str,
        operation: &str,
        current_size: u64,
        max_size_mb: u64,
    ) -> Self {
        Self::new(
            FILESYSTEM_ERROR,
            format!(
                "File too large: {filename} ({current_size} bytes exceeds the {max_size_mb} MB limit)"
            ),
            ErrorData::FileTooLarge {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
                current_size,
                max_size_mb,
            },
        )
    }

    /// File is not valid UTF-8 text
    pub fn invalid_encoding(filename: &str, operation: &str) -> Self {
        Self::new(
            FILESYSTEM_ERROR,
            format!("Invalid file encoding: {filename} is not valid UTF-8 text"),
            ErrorData::InvalidEncoding {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
            },
        )
    }

    /// Per-file edit lock could not be acquired
    pub fn lock_failed(filename: &str, operation: &str) -> Self {
        Self::new(
            LOCK_FAILED,
            format!("Failed to acquire lock on file: {filename}"),
            ErrorData::LockFailed {
                filename: filename.to_owned(),
                operation: operation.to_owned(),
            },
        )
    }

    /// Creation time in RFC3339 with a `Z` suffix
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// HTTP status this error maps to
    pub fn http_status(&self) -> u16 {
        map_error_to_http_status(self.code, Some(self))
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorDetail {}

impl Serialize for ErrorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            code: i32,
            message: &'a str,
            data: Map<String, Value>,
        }

        Wire {
            code: self.code,
            message: &self.message,
            data: self.data.to_map(&self.timestamp_rfc3339()),
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Wire Projections
// ============================================================================

/// HTTP error body: `{"error": <ErrorDetail>}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Wrapped error detail
    pub error: ErrorDetail,
}

/// JSON-RPC error object placed in the `error` member of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Narrowed error context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonRpcErrorData>,
}

/// Fixed set of context fields exposed on JSON-RPC errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// File the error refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Operation the error refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// RFC3339 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Explanation, with any extra context folded in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrap an error for an HTTP body, or `None` when there is nothing to report
pub fn to_error_response(detail: Option<&ErrorDetail>) -> Option<ErrorResponse> {
    let detail = detail?;
    Some(ErrorResponse {
        error: detail.clone(),
    })
}

/// Project an [`ErrorDetail`] onto the JSON-RPC error shape
///
/// Parameter issues and the filesystem sub-type are not part of the fixed
/// field set; they are appended to `details` as
/// `"<details>. Parameter issues: <issues>"` and `"<details> (type: <type>)"`.
pub fn to_jsonrpc_error(detail: &ErrorDetail) -> JsonRpcError {
    let details = match &detail.data {
        ErrorData::InvalidParams {
            details,
            param_issues,
            ..
        } if !param_issues.is_empty() => Some(format!(
            "{details}. Parameter issues: {param_issues:?}"
        )),
        data => data.details(),
    };
    let details = match (details, detail.data.fs_type()) {
        (Some(details), Some(fs_type)) => Some(format!("{details} (type: {})", fs_type.as_str())),
        (None, Some(fs_type)) => Some(format!("(type: {})", fs_type.as_str())),
        (details, None) => details,
    };

    JsonRpcError {
        code: detail.code,
        message: detail.message.clone(),
        data: Some(JsonRpcErrorData {
            filename: detail.data.filename().map(ToOwned::to_owned),
            operation: detail.data.operation().map(ToOwned::to_owned),
            timestamp: Some(detail.timestamp_rfc3339()),
            details,
        }),
    }
}

/// Infer the HTTP status for an error code
///
/// [`FILESYSTEM_ERROR`] is overloaded, so its status depends on the
/// sub-type carried by `detail`. Unknown codes map to 500.
pub fn map_error_to_http_status(code: i32, detail: Option<&ErrorDetail>) -> u16 {
    match code {
        PARSE_ERROR | INVALID_REQUEST | INVALID_PARAMS => 400,
        METHOD_NOT_FOUND => 404,
        FILESYSTEM_ERROR => detail
            .and_then(|d| d.data.fs_type())
            .map_or(500, FsErrorType::http_status),
        LOCK_FAILED => 409,
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_constructor() -> Vec<ErrorDetail> {
        let mut issues = BTreeMap::new();
        issues.insert("name".to_owned(), "required".to_owned());
        vec![
            ErrorDetail::parse_error("unexpected EOF"),
            ErrorDetail::invalid_request("missing method"),
            ErrorDetail::method_not_found("tools/frobnicate"),
            ErrorDetail::invalid_params("bad arguments"),
            ErrorDetail::invalid_params_for("bad", issues, Some("a.txt"), Some("read")),
            ErrorDetail::internal("boom"),
            ErrorDetail::filesystem("a.txt", "write", "disk full"),
            ErrorDetail::file_not_found("a.txt", "read"),
            ErrorDetail::permission_denied("a.txt", "read"),
            ErrorDetail::file_too_large("a.txt", "read", 20_000_000, 10),
            ErrorDetail::invalid_encoding("a.txt", "read"),
            ErrorDetail::lock_failed("a.txt", "edit"),
        ]
    }

    #[test]
    fn every_constructor_carries_timestamp() {
        for detail in every_constructor() {
            let json = serde_json::to_value(&detail).expect("serialize");
            let ts = json["data"]["timestamp"].as_str().expect("timestamp");
            assert!(
                DateTime::parse_from_rfc3339(ts).is_ok(),
                "bad timestamp {ts}"
            );
            assert!(ts.ends_with('Z'));
        }
    }

    #[test]
    fn round_trip_status_matches_table() {
        let expected = [400, 400, 404, 400, 400, 500, 500, 404, 403, 413, 400, 409];
        for (detail, status) in every_constructor().iter().zip(expected) {
            let rpc = to_jsonrpc_error(detail);
            assert_eq!(
                map_error_to_http_status(rpc.code, Some(detail)),
                status,
                "{detail}"
            );
        }
    }

    #[test]
    fn filesystem_code_without_detail_is_500() {
        assert_eq!(map_error_to_http_status(FILESYSTEM_ERROR, None), 500);
        assert_eq!(map_error_to_http_status(-1, None), 500);
        assert_eq!(map_error_to_http_status(LOCK_FAILED, None), 409);
    }

    #[test]
    fn jsonrpc_error_folds_param_issues_into_details() {
        let mut issues = BTreeMap::new();
        issues.insert("start_line".to_owned(), "must be >= 1".to_owned());
        let detail =
            ErrorDetail::invalid_params_for("read_file arguments", issues, Some("x.txt"), None);
        let rpc = to_jsonrpc_error(&detail);
        let data = rpc.data.expect("data");
        assert_eq!(data.filename.as_deref(), Some("x.txt"));
        assert!(data.operation.is_none());
        assert_eq!(
            data.details.as_deref(),
            Some(r#"read_file arguments. Parameter issues: {"start_line": "must be >= 1"}"#)
        );
    }

    #[test]
    fn http_body_carries_type_discriminator() {
        let detail = ErrorDetail::file_too_large("big.log", "read", 42, 1);
        let body = to_error_response(Some(&detail)).expect("body");
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"]["code"], FILESYSTEM_ERROR);
        assert_eq!(json["error"]["data"]["type"], "file_too_large");
        assert_eq!(json["error"]["data"]["current_size"], 42);
        assert_eq!(json["error"]["data"]["max_size_mb"], 1);
        assert_eq!(json["error"]["data"]["filename"], "big.log");
    }

    #[test]
    fn no_detail_means_no_body() {
        assert!(to_error_response(None).is_none());
        let detail = ErrorDetail::lock_failed("a.txt", "edit");
        let body = to_error_response(Some(&detail)).expect("body");
        assert_eq!(body.error, detail);
    }

    #[test]
    fn jsonrpc_error_folds_filesystem_type_into_details() {
        let missing = to_jsonrpc_error(&ErrorDetail::file_not_found("gone.txt", "read"));
        assert_eq!(
            missing.data.expect("data").details.as_deref(),
            Some("(type: file_not_found)")
        );

        let big = to_jsonrpc_error(&ErrorDetail::file_too_large("big.log", "read", 42, 1));
        assert_eq!(
            big.data.expect("data").details.as_deref(),
            Some("File size 42 bytes exceeds the 1 MB limit (type: file_too_large)")
        );

        let locked = to_jsonrpc_error(&ErrorDetail::lock_failed("a.txt", "edit"));
        assert!(locked.data.expect("data").details.is_none());
    }

    #[test]
    fn method_not_found_message_names_method() {
        let detail = ErrorDetail::method_not_found("resources/list");
        assert_eq!(detail.message, "Method not found: resources/list");
        assert_eq!(detail.http_status(), 404);
    }
}
