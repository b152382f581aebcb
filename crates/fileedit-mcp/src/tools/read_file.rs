// ABOUTME: MCP tool reading a whole file or an inclusive range of lines
// ABOUTME: Validates the name and line bounds before asking the file service
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use fileedit::errors::ErrorDetail;
use fileedit::types::{FileOperationService, ReadFileRequest};
use serde_json::json;
use serde_json::value::RawValue;
use tracing::warn;

use crate::protocol::{ToolAnnotations, ToolDefinition};
use crate::tools::format::format_read_file_result;
use crate::tools::{decode_arguments, McpTool, ToolOutcome};

/// Reads file content, optionally restricted to a line range
pub struct ReadFile;

#[async_trait]
impl McpTool for ReadFile {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "read_file".to_owned(),
            description: "Read a file from the working directory, either whole or as an inclusive 1-based line range".to_owned(),
            arguments_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "File name inside the working directory",
                        "pattern": "^[a-zA-Z0-9._-]+$",
                        "minLength": 1,
                        "maxLength": fileedit::types::MAX_NAME_LENGTH
                    },
                    "start_line": {
                        "type": "integer",
                        "description": "First line to return (1-based, inclusive)",
                        "minimum": 1
                    },
                    "end_line": {
                        "type": "integer",
                        "description": "Last line to return (1-based, inclusive)",
                        "minimum": 1
                    }
                },
                "required": ["name"],
                "additionalProperties": false
            }),
            response_schema: json!({
                "type": "object",
                "properties": {
                    "content": { "type": "string" },
                    "filename": { "type": "string" },
                    "total_lines": { "type": "integer" },
                    "requested_start_line": { "type": "integer" },
                    "requested_end_line": { "type": "integer" },
                    "actual_end_line": { "type": "integer" },
                    "is_range": { "type": "boolean" }
                },
                "required": ["content", "filename", "total_lines", "is_range"]
            }),
            annotations: ToolAnnotations {
                read_only_hint: true,
                destructive_hint: false,
            },
        }
    }

    async fn execute(
        &self,
        service: &dyn FileOperationService,
        arguments: &RawValue,
    ) -> Result<ToolOutcome, ErrorDetail> {
        let request: ReadFileRequest = decode_arguments("read_file", arguments)?;

        match service.read_file(&request).await {
            Ok(r) => Ok(ToolOutcome::Success(format_read_file_result(
                &r.content,
                &r.filename,
                r.total_lines,
                r.requested_start_line,
                r.requested_end_line,
                r.actual_end_line,
                r.is_range,
            ))),
            Err(detail) => {
                warn!(file = %request.name, code = detail.code, error = %detail, "read_file failed");
                Ok(ToolOutcome::Failed(detail))
            }
        }
    }
}
