// ABOUTME: MCP tool listing the regular files in the working directory
// ABOUTME: Renders name, modification time, and line count for each file
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use fileedit::errors::ErrorDetail;
use fileedit::types::{FileOperationService, ListFilesRequest};
use serde_json::json;
use serde_json::value::RawValue;
use tracing::warn;

use crate::protocol::{ToolAnnotations, ToolDefinition};
use crate::tools::format::format_list_files_result;
use crate::tools::{decode_arguments, McpTool, ToolOutcome};

/// Lists files in the working directory
pub struct ListFiles;

#[async_trait]
impl McpTool for ListFiles {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_files".to_owned(),
            description: "List the files in the working directory with their modification time and line count".to_owned(),
            arguments_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            response_schema: json!({
                "type": "object",
                "properties": {
                    "files": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "size": { "type": "integer" },
                                "modified": { "type": "string", "format": "date-time" },
                                "lines": { "type": "integer", "description": "-1 when unknown" }
                            },
                            "required": ["name", "size", "modified", "lines"]
                        }
                    }
                },
                "required": ["files"]
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
        let request: ListFilesRequest = decode_arguments("list_files", arguments)?;

        match service.list_files(&request).await {
            Ok(response) => Ok(ToolOutcome::Success(format_list_files_result(
                &response.files,
            ))),
            Err(detail) => {
                warn!(code = detail.code, error = %detail, "list_files failed");
                Ok(ToolOutcome::Failed(detail))
            }
        }
    }
}
