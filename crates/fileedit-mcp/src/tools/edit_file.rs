// ABOUTME: MCP tool applying ordered line edits and appends to a file
// ABOUTME: Can create the file first and reports how many lines were touched
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use fileedit::errors::ErrorDetail;
use fileedit::types::{EditFileRequest, FileOperationService};
use serde_json::json;
use serde_json::value::RawValue;
use tracing::{info, warn};

use crate::protocol::{ToolAnnotations, ToolDefinition};
use crate::tools::format::format_edit_file_result;
use crate::tools::{decode_arguments, McpTool, ToolOutcome};

/// Edits a file line by line
pub struct EditFile;

#[async_trait]
impl McpTool for EditFile {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "edit_file".to_owned(),
            description: "Apply line edits (replace, insert, delete) in order, then optionally append text. Can create the file when it does not exist".to_owned(),
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
                    "edits": {
                        "type": "array",
                        "description": "Edits applied in order; line numbers refer to the file as left by the previous edit",
                        "items": {
                            "type": "object",
                            "properties": {
                                "line": { "type": "integer", "minimum": 1 },
                                "content": { "type": "string" },
                                "operation": {
                                    "type": "string",
                                    "enum": ["replace", "insert", "delete"]
                                }
                            },
                            "required": ["line", "operation"],
                            "additionalProperties": false
                        }
                    },
                    "append": {
                        "type": "string",
                        "description": "Text appended after all edits"
                    },
                    "create_if_missing": {
                        "type": "boolean",
                        "description": "Create an empty file first when it does not exist",
                        "default": false
                    }
                },
                "required": ["name"],
                "additionalProperties": false
            }),
            response_schema: json!({
                "type": "object",
                "properties": {
                    "filename": { "type": "string" },
                    "lines_modified": { "type": "integer" },
                    "new_total_lines": { "type": "integer" },
                    "file_created": { "type": "boolean" }
                },
                "required": ["filename", "lines_modified", "new_total_lines", "file_created"]
            }),
            annotations: ToolAnnotations {
                read_only_hint: false,
                destructive_hint: true,
            },
        }
    }

    async fn execute(
        &self,
        service: &dyn FileOperationService,
        arguments: &RawValue,
    ) -> Result<ToolOutcome, ErrorDetail> {
        let request: EditFileRequest = decode_arguments("edit_file", arguments)?;

        match service.edit_file(&request).await {
            Ok(r) => {
                info!(
                    file = %r.filename,
                    lines_modified = r.lines_modified,
                    created = r.file_created,
                    "File edited"
                );
                Ok(ToolOutcome::Success(format_edit_file_result(
                    &r.filename,
                    r.lines_modified,
                    r.new_total_lines,
                    r.file_created,
                )))
            }
            Err(detail) => {
                warn!(file = %request.name, code = detail.code, error = %detail, "edit_file failed");
                Ok(ToolOutcome::Failed(detail))
            }
        }
    }
}
