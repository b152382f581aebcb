// ABOUTME: Library root for the fileedit MCP server
// ABOUTME: Exposes the protocol model, tool processor, tools, and transports for reuse by other binaries
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

//! MCP server exposing `list_files`, `read_file`, and `edit_file` over
//! JSON-RPC 2.0. [`McpServer`](server::McpServer) is transport-agnostic;
//! [`transport::stdio`] and [`transport::http`] feed it requests.

/// JSON-RPC and MCP wire types
pub mod protocol;
/// Tool processor: method routing and dispatch
pub mod server;
/// Tool registry and the three file tools
pub mod tools;
/// Stdio and HTTP transports
pub mod transport;

pub use server::McpServer;
pub use tools::build_tool_registry;
