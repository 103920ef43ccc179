//! zbigniew MCP server binary.
//!
//! Exposes shell, file and page-fetch tools to MCP clients over stdio.
//!
//! Usage:
//!   cargo run -p zbigniew-mcp
//!   cargo run -p zbigniew-mcp -- --config ./zbigniew.toml --shell-timeout 120
//!
//! Test with MCP inspector:
//!   npx @modelcontextprotocol/inspector cargo run -p zbigniew-mcp

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{EnvFilter, fmt};

use zbigniew_mcp::ZbigniewMcp;
use zbigniew_tools::ServerConfig;

/// MCP server exposing local shell, file and page-fetch tools.
#[derive(Parser, Debug)]
#[command(name = "zbigniew-mcp")]
#[command(about = "MCP server for shell, file and web page tools")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/zbigniew/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default command timeout in seconds
    #[arg(long)]
    shell_timeout: Option<u64>,

    /// Default match cap for search_in_file (-1 for unlimited)
    #[arg(long, allow_negative_numbers = true)]
    max_matches: Option<i64>,

    /// Headless browser used by fetch_page
    #[arg(long)]
    browser: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(secs) = self.shell_timeout {
            config.shell.default_timeout_secs = secs;
        }
        if let Some(max) = self.max_matches {
            config.search.default_max_matches = max;
        }
        if let Some(browser) = &self.browser {
            config.fetch.browser = browser.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing to stderr (MCP uses stdio for protocol)
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);
    tracing::info!(
        shell_timeout = config.shell.default_timeout_secs,
        max_matches = config.search.default_max_matches,
        browser = %config.fetch.browser,
        "Configuration loaded"
    );

    let service = ZbigniewMcp::new(config)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("MCP server error: {:?}", e);
        })?;

    tracing::info!("zbigniew-mcp server ready");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("zbigniew-mcp server shutting down");
    Ok(())
}
