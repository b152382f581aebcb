// ABOUTME: Core types for the file editing toolkit: service contract, tool argument shapes, errors
// ABOUTME: Provides the FileOperationService trait plus list/read/edit request and response types
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Core Types
//!
//! The file operation contract consumed by the tool processor. Requests
//! double as the wire-level tool argument shapes, so they decode strictly
//! and can report every constraint violation in one pass.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ErrorDetail;

/// Longest file name accepted by any tool
pub const MAX_NAME_LENGTH: usize = 255;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for process-level failures (startup, configuration, transport I/O)
#[derive(Debug, Clone)]
pub struct ServerError {
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// Categories of process-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error
    Config,
    /// Transport read/write failure
    Io,
}

impl ServerError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: message.into(),
        }
    }

    /// Create a transport I/O error
    pub fn io(context: impl Into<String>, source: &std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: format!("{}: {source}", context.into()),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tool Arguments
// ============================================================================

/// Arguments for `list_files` (none accepted)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFilesRequest {}

/// Arguments for `read_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadFileRequest {
    /// File name inside the working directory
    pub name: String,
    /// First line to return (1-based, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<i64>,
    /// Last line to return (1-based, inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<i64>,
}

impl ReadFileRequest {
    /// Read the whole file
    pub fn whole(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_line: None,
            end_line: None,
        }
    }

    /// Read an inclusive line range; either bound may be open
    pub fn range(name: impl Into<String>, start_line: Option<i64>, end_line: Option<i64>) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line,
        }
    }

    /// Whether any line bound was requested
    pub const fn is_range(&self) -> bool {
        self.start_line.is_some() || self.end_line.is_some()
    }

    /// Collect every constraint violation, keyed by argument name
    pub fn param_issues(&self) -> BTreeMap<String, String> {
        let mut issues = BTreeMap::new();
        if let Some(issue) = file_name_issue(&self.name) {
            issues.insert("name".to_owned(), issue);
        }
        if self.start_line.is_some_and(|l| l < 1) {
            issues.insert("start_line".to_owned(), "must be >= 1".to_owned());
        }
        if self.end_line.is_some_and(|l| l < 1) {
            issues.insert("end_line".to_owned(), "must be >= 1".to_owned());
        }
        if let (Some(start), Some(end)) = (self.start_line, self.end_line) {
            if start >= 1 && end >= 1 && end < start {
                issues.insert(
                    "end_line".to_owned(),
                    format!("must not be less than start_line ({start})"),
                );
            }
        }
        issues
    }
}

/// Kind of change applied at a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOperation {
    /// Overwrite the line with new content
    Replace,
    /// Insert new content before the line
    Insert,
    /// Remove the line
    Delete,
}

impl EditOperation {
    /// Wire name of the operation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line-addressed edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineEdit {
    /// Target line (1-based)
    pub line: i64,
    /// New content for replace/insert; may span several lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// What to do at the line
    pub operation: EditOperation,
}

/// Arguments for `edit_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditFileRequest {
    /// File name inside the working directory
    pub name: String,
    /// Edits applied in order against the evolving file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<LineEdit>,
    /// Text appended after all edits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<String>,
    /// Create an empty file first when the target does not exist
    #[serde(default)]
    pub create_if_missing: bool,
}

impl EditFileRequest {
    /// Start an edit request for the given file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edits: Vec::new(),
            append: None,
            create_if_missing: false,
        }
    }

    /// Add one line edit
    pub fn with_edit(mut self, line: i64, operation: EditOperation, content: Option<&str>) -> Self {
        self.edits.push(LineEdit {
            line,
            content: content.map(ToOwned::to_owned),
            operation,
        });
        self
    }

    /// Append text after the edits
    pub fn with_append(mut self, text: impl Into<String>) -> Self {
        self.append = Some(text.into());
        self
    }

    /// Create the file when missing
    pub const fn creating(mut self) -> Self {
        self.create_if_missing = true;
        self
    }

    /// Collect every constraint violation, keyed by argument name
    pub fn param_issues(&self) -> BTreeMap<String, String> {
        let mut issues = BTreeMap::new();
        if let Some(issue) = file_name_issue(&self.name) {
            issues.insert("name".to_owned(), issue);
        }
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.line < 1 {
                issues.insert(format!("edits[{i}].line"), "must be >= 1".to_owned());
            }
        }
        issues
    }
}

/// Check a file name against the accepted pattern `^[a-zA-Z0-9._-]+$`
///
/// Returns a description of the problem, or `None` when the name is valid.
pub fn file_name_issue(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("must not be empty".to_owned());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!("must be at most {MAX_NAME_LENGTH} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Some("must match ^[a-zA-Z0-9._-]+$".to_owned());
    }
    None
}

// ============================================================================
// Service Responses
// ============================================================================

/// Metadata for one file in the working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Line count, or -1 when it could not be determined
    pub lines: i64,
}

/// Result of `list_files`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilesResponse {
    /// Files in name order
    pub files: Vec<FileInfo>,
}

/// Result of `read_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileResponse {
    /// Returned text (whole file, or the requested lines joined by `\n`)
    pub content: String,
    /// File that was read
    pub filename: String,
    /// Line count of the whole file
    pub total_lines: usize,
    /// Requested first line, 0 when not given
    pub requested_start_line: usize,
    /// Requested last line, 0 when not given
    pub requested_end_line: usize,
    /// Zero-based index of the last returned line, -1 when nothing was returned
    pub actual_end_line: i64,
    /// Whether a line range was requested
    pub is_range: bool,
}

/// Result of `edit_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFileResponse {
    /// File that was edited
    pub filename: String,
    /// Number of lines touched by edits and appends
    pub lines_modified: usize,
    /// Line count after editing
    pub new_total_lines: usize,
    /// Whether the file was created by this request
    pub file_created: bool,
}

// ============================================================================
// Service Trait
// ============================================================================

/// File access backend consumed by the tool processor
///
/// Implementations own path containment, size limits, encoding checks,
/// and per-file locking. Every failure is reported as an [`ErrorDetail`]
/// built through the error catalog.
#[async_trait]
pub trait FileOperationService: Send + Sync {
    /// Enumerate files in the working directory
    async fn list_files(&self, request: &ListFilesRequest)
        -> Result<ListFilesResponse, ErrorDetail>;

    /// Read a whole file or an inclusive line range
    async fn read_file(&self, request: &ReadFileRequest) -> Result<ReadFileResponse, ErrorDetail>;

    /// Apply line edits and appends to a file
    async fn edit_file(&self, request: &EditFileRequest) -> Result<EditFileResponse, ErrorDetail>;
}
