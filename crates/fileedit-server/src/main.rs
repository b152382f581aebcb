// ABOUTME: CLI entry point for the fileedit REST API server binary
// ABOUTME: Parses arguments, creates shared state, and starts the axum HTTP server
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fileedit::types::ServerError;
use fileedit::{LocalFileService, ServerConfig};
use fileedit_mcp::transport::http::{shutdown_signal, HttpLimits};
use fileedit_mcp::{build_tool_registry, McpServer};

use fileedit_server::router;
use fileedit_server::state::ServerState;

/// fileedit-server: REST API and MCP endpoint for listing, reading, and editing files
#[derive(Parser)]
#[command(name = "fileedit-server", version, about)]
struct Cli {
    /// HTTP listen port
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// HTTP listen host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Working directory the tools operate in
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Largest file that may be read or produced by an edit, in MB
    #[arg(long, value_parser = fileedit::config::parse_size_mb)]
    max_file_size_mb: Option<u64>,

    /// Largest accepted HTTP request body, in MB
    #[arg(long, value_parser = fileedit::config::parse_size_mb)]
    max_body_mb: Option<u64>,

    /// Seconds an edit waits for the per-file lock
    #[arg(long, value_parser = fileedit::config::parse_timeout)]
    lock_timeout: Option<Duration>,

    /// Seconds allowed to handle one HTTP request
    #[arg(long, value_parser = fileedit::config::parse_timeout)]
    request_timeout: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let dir = cli.dir.canonicalize().map_err(|e| {
        ServerError::config(format!(
            "Invalid working directory {}: {e}",
            cli.dir.display()
        ))
    })?;
    let config = ServerConfig::new(dir);
    #[cfg(feature = "config-file")]
    let config = fileedit::config::FileConfig::load(&config.working_directory).apply(config);
    let max_file_size_mb = cli.max_file_size_mb.unwrap_or(config.max_file_size_mb);
    let max_body_mb = cli.max_body_mb.unwrap_or(config.max_body_mb);
    let lock_timeout = cli.lock_timeout.unwrap_or(config.lock_timeout);
    let request_timeout = cli.request_timeout.unwrap_or(config.request_timeout);
    let config = config
        .with_max_file_size_mb(max_file_size_mb)
        .with_max_body_mb(max_body_mb)
        .with_lock_timeout(lock_timeout)
        .with_request_timeout(request_timeout);

    let service = Arc::new(LocalFileService::new(&config));
    let server = Arc::new(McpServer::new(service, build_tool_registry()));
    let state = Arc::new(ServerState::new(server, HttpLimits::from_config(&config)));
    let app = router::build(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::io(format!("Failed to bind {addr}"), &e))?;

    tracing::info!(
        address = %addr,
        dir = %config.working_directory.display(),
        max_file_size_mb = config.max_file_size_mb,
        max_body_mb = config.max_body_mb,
        "Starting fileedit REST API server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::io("Server error", &e))?;

    Ok(())
}
