// ABOUTME: Tool registry that maps MCP tool names to handler implementations
// ABOUTME: Provides the McpTool trait, ToolOutcome, and an ordered ToolRegistry for discovery and dispatch
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod edit_file;
pub mod format;
pub mod list_files;
pub mod read_file;

use std::collections::BTreeMap;

use async_trait::async_trait;
use fileedit::errors::ErrorDetail;
use fileedit::types::{EditFileRequest, FileOperationService, ListFilesRequest, ReadFileRequest};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::protocol::{CallToolResult, ToolDefinition};

/// Trait implemented by each MCP tool exposed by this server
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Return the tool's MCP definition (name, description, schemas, hints)
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool against the file service
    ///
    /// Arguments that fail to decode or validate are returned as `Err` and
    /// surface as a JSON-RPC invalid-params error. Service failures are
    /// reported as [`ToolOutcome::Failed`].
    async fn execute(
        &self,
        service: &dyn FileOperationService,
        arguments: &RawValue,
    ) -> Result<ToolOutcome, ErrorDetail>;
}

/// What a dispatched tool call produced
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// Formatted success text
    Success(String),
    /// The service reported an error
    Failed(ErrorDetail),
    /// No tool is registered under this name
    UnknownTool(String),
}

impl ToolOutcome {
    /// Catalog error behind a failed outcome, if any
    pub const fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Failed(detail) => Some(detail),
            Self::Success(_) | Self::UnknownTool(_) => None,
        }
    }

    /// Render as the MCP result carried in a JSON-RPC success envelope
    pub fn into_result(self) -> CallToolResult {
        match self {
            Self::Success(text) => CallToolResult::text(text),
            Self::Failed(detail) => CallToolResult::error(format::format_tool_error(Some(&detail))),
            Self::UnknownTool(name) => CallToolResult::error(format::format_unknown_tool(&name)),
        }
    }
}

/// Registry mapping tool names to their handler implementations
///
/// Registration order is preserved so `tools/list` output is stable.
/// Definitions are captured once at registration.
pub struct ToolRegistry {
    tools: Vec<(ToolDefinition, Box<dyn McpTool>)>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool handler, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        let definition = tool.definition();
        if let Some(slot) = self
            .tools
            .iter_mut()
            .find(|(d, _)| d.name == definition.name)
        {
            *slot = (definition, tool);
        } else {
            self.tools.push((definition, tool));
        }
    }

    /// List all registered tool definitions for `tools/list` responses
    pub fn list_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(d, _)| d.clone()).collect()
    }

    /// Registered tool names in registration order
    #[cfg(test)]
    fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(d, _)| d.name.as_str()).collect()
    }

    /// Dispatch a `tools/call` to the named tool handler
    pub async fn execute(
        &self,
        name: &str,
        service: &dyn FileOperationService,
        arguments: &RawValue,
    ) -> Result<ToolOutcome, ErrorDetail> {
        match self.tools.iter().find(|(d, _)| d.name == name) {
            Some((_, tool)) => tool.execute(service, arguments).await,
            None => Ok(ToolOutcome::UnknownTool(name.to_owned())),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default tool registry with the three file tools
pub fn build_tool_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(list_files::ListFiles));
    registry.register(Box::new(read_file::ReadFile));
    registry.register(Box::new(edit_file::EditFile));
    registry
}

/// Tool arguments that can check their own constraints after decoding
pub trait ToolArguments: DeserializeOwned {
    /// Every constraint violation, keyed by argument name
    fn param_issues(&self) -> BTreeMap<String, String>;

    /// Target file, when the arguments name one
    fn file_name(&self) -> Option<&str> {
        None
    }
}

impl ToolArguments for ListFilesRequest {
    fn param_issues(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

impl ToolArguments for ReadFileRequest {
    fn param_issues(&self) -> BTreeMap<String, String> {
        Self::param_issues(self)
    }

    fn file_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl ToolArguments for EditFileRequest {
    fn param_issues(&self) -> BTreeMap<String, String> {
        Self::param_issues(self)
    }

    fn file_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Decode tool arguments strictly, then run their own validation
pub fn decode_arguments<T: ToolArguments>(
    tool: &str,
    arguments: &RawValue,
) -> Result<T, ErrorDetail> {
    let request: T = serde_json::from_str(arguments.get()).map_err(|e| {
        ErrorDetail::invalid_params_for(
            format!("Invalid arguments for {tool}: {e}"),
            BTreeMap::new(),
            None,
            Some(tool),
        )
    })?;

    let issues = request.param_issues();
    if !issues.is_empty() {
        return Err(ErrorDetail::invalid_params_for(
            format!("Invalid arguments for {tool}"),
            issues,
            request.file_name(),
            Some(tool),
        ));
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_registration_order() {
        let registry = build_tool_registry();
        assert_eq!(registry.names(), ["list_files", "read_file", "edit_file"]);
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = build_tool_registry();
        registry.register(Box::new(read_file::ReadFile));
        assert_eq!(registry.list_definitions().len(), 3);
    }

    #[test]
    fn outcome_rendering() {
        let ok = ToolOutcome::Success("done".to_owned()).into_result();
        assert!(!ok.is_error);
        assert_eq!(ok.first_text(), "done");

        let failed = ToolOutcome::Failed(ErrorDetail::lock_failed("a.txt", "edit")).into_result();
        assert!(failed.is_error);
        assert_eq!(
            failed.first_text(),
            "Error: Failed to acquire lock on file: a.txt"
        );

        let unknown = ToolOutcome::UnknownTool("nope".to_owned()).into_result();
        assert!(unknown.is_error);
        assert_eq!(unknown.first_text(), "Error: Unknown tool 'nope'.");
    }

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_owned()).expect("raw json")
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let err = decode_arguments::<ReadFileRequest>("read_file", &raw(r#"{"name":"a","x":1}"#))
            .expect_err("unknown field");
        assert_eq!(err.code, fileedit::errors::INVALID_PARAMS);
        assert!(err.message.contains("unknown field"));
    }

    #[test]
    fn decode_reports_param_issues_with_file_name() {
        let err = decode_arguments::<ReadFileRequest>(
            "read_file",
            &raw(r#"{"name":"a.txt","start_line":0}"#),
        )
        .expect_err("bad start");
        assert_eq!(err.data.filename(), Some("a.txt"));
        assert_eq!(err.data.operation(), Some("read_file"));
    }

    #[test]
    fn decode_accepts_empty_list_arguments() {
        assert!(decode_arguments::<ListFilesRequest>("list_files", &raw("{}")).is_ok());
    }
}
