// ABOUTME: CLI entry point for the fileedit MCP server binary
// ABOUTME: Parses arguments, selects transport (stdio or HTTP), and starts serving
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fileedit::types::ServerError;
use fileedit::{LocalFileService, ServerConfig};

use fileedit_mcp::transport::http::{HttpLimits, HttpTransport};
use fileedit_mcp::transport::stdio::StdioTransport;
use fileedit_mcp::transport::McpTransport;
use fileedit_mcp::{build_tool_registry, McpServer};

/// fileedit-mcp: MCP server for listing, reading, and editing files
#[derive(Parser)]
#[command(name = "fileedit-mcp", version, about)]
struct Cli {
    /// Transport mode: "stdio" for stdin/stdout or "http" for HTTP POST /mcp
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// HTTP listen port (only used with --transport http)
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// HTTP listen host (only used with --transport http)
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

impl Cli {
    /// Build the server configuration: defaults, then config files, then flags
    fn server_config(&self) -> Result<ServerConfig, ServerError> {
        let dir = self.dir.canonicalize().map_err(|e| {
            ServerError::config(format!(
                "Invalid working directory {}: {e}",
                self.dir.display()
            ))
        })?;
        if !dir.is_dir() {
            return Err(ServerError::config(format!(
                "Working directory {} is not a directory",
                dir.display()
            )));
        }

        let config = ServerConfig::new(dir);
        #[cfg(feature = "config-file")]
        let config = fileedit::config::FileConfig::load(&config.working_directory).apply(config);

        let max_file_size_mb = self.max_file_size_mb.unwrap_or(config.max_file_size_mb);
        let max_body_mb = self.max_body_mb.unwrap_or(config.max_body_mb);
        let lock_timeout = self.lock_timeout.unwrap_or(config.lock_timeout);
        let request_timeout = self.request_timeout.unwrap_or(config.request_timeout);
        Ok(config
            .with_max_file_size_mb(max_file_size_mb)
            .with_max_body_mb(max_body_mb)
            .with_lock_timeout(lock_timeout)
            .with_request_timeout(request_timeout))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr to keep stdout clean for stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.server_config()?;

    let service = Arc::new(LocalFileService::new(&config));
    let server = Arc::new(McpServer::new(service, build_tool_registry()));

    tracing::info!(
        transport = %cli.transport,
        dir = %config.working_directory.display(),
        max_file_size_mb = config.max_file_size_mb,
        max_body_mb = config.max_body_mb,
        "Starting fileedit MCP server"
    );

    match cli.transport.as_str() {
        "stdio" => {
            StdioTransport.serve(server).await?;
        }
        "http" => {
            HttpTransport::new(cli.host, cli.port, HttpLimits::from_config(&config))
                .serve(server)
                .await?;
        }
        other => {
            return Err(ServerError::config(format!(
                "Unknown transport: {other}. Valid: stdio, http"
            ))
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_flags_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cli = Cli::try_parse_from([
            "fileedit-mcp",
            "--dir",
            dir.path().to_str().expect("utf-8 path"),
            "--lock-timeout",
            "2",
            "--request-timeout",
            "45",
        ])
        .expect("parse");
        let config = cli.server_config().expect("config");
        assert_eq!(config.lock_timeout, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(45));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["fileedit-mcp", "--lock-timeout", "soon"]).is_err());
    }
}
