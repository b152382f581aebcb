// ABOUTME: File editing toolkit for AI agents: error catalog, service contract, local backend
// ABOUTME: Re-exports the FileOperationService trait, request/response shapes, and LocalFileService
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # fileedit: File Operations for Agents
//!
//! Shared foundation for the `fileedit-mcp` and `fileedit-server` binaries.
//! Agents list a working directory, read whole files or line ranges, and
//! apply ordered line edits. Every failure is an
//! [`ErrorDetail`](errors::ErrorDetail) that knows how to render itself as a
//! JSON-RPC error, an HTTP error body, or an HTTP status.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileedit::{LocalFileService, ServerConfig};
//! use fileedit::types::{FileOperationService, ReadFileRequest};
//!
//! # async fn example() -> Result<(), fileedit::errors::ErrorDetail> {
//! let config = ServerConfig::new(".".into());
//! let service = LocalFileService::new(&config);
//! let read = service.read_file(&ReadFileRequest::range("notes.txt", Some(1), Some(10))).await?;
//! println!("{}", read.content);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error codes, `ErrorDetail`, JSON-RPC/HTTP projections
//! - [`types`]: `FileOperationService` trait, tool arguments, responses
//! - [`config`]: Size limits, timeouts, optional TOML loading
//! - [`local`]: Local directory implementation of the service
//! - [`lock`]: Per-file edit locks

/// Error catalog shared by every transport
pub mod errors;
/// Core types: service trait, tool arguments, responses, process errors
pub mod types;

/// Shared configuration
pub mod config;
/// Local filesystem service
pub mod local;
/// Per-file edit locks
pub mod lock;

pub use config::ServerConfig;
pub use errors::ErrorDetail;
pub use local::LocalFileService;
