//! GitHub Projects MCP Server
//!
//! Exposes GitHub Projects (v2) boards, columns and cards as MCP tools over
//! stdio, talking to the GitHub GraphQL API through `gh` or HTTPS.
//!
//! # Usage
//!
//! Run directly:
//! ```bash
//! github-projects-mcp --transport gh
//! ```
//!
//! Or configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "github-projects": {
//!       "command": "./target/release/github-projects-mcp"
//!     }
//!   }
//! }
//! ```

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use std::path::PathBuf;

use github_projects_mcp::config::{Config, Transport};
use github_projects_mcp::github::check_gh_available;
use github_projects_mcp::init::init_tracing;
use github_projects_mcp::GitHubProjectsMcpServer;

#[derive(Debug, Parser)]
#[command(name = "github-projects-mcp", version, about = "MCP server for GitHub Projects (v2)")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "GITHUB_PROJECTS_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// How to reach the GraphQL API
    #[arg(long, value_enum, env = "GITHUB_PROJECTS_TRANSPORT")]
    transport: Option<Transport>,

    /// GitHub Enterprise host for the gh transport
    #[arg(long, env = "GH_HOST")]
    hostname: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr, stdout is the MCP channel
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(transport) = cli.transport {
        config.github.transport = transport;
    }
    if let Some(hostname) = cli.hostname {
        config.github.hostname = Some(hostname);
    }

    tracing::info!(transport = ?config.github.transport, "Starting GitHub Projects MCP Server");

    if config.github.transport == Transport::Gh {
        if let Err(e) = check_gh_available(config.github.hostname.as_deref()).await {
            tracing::warn!("gh CLI check failed: {}", e);
            // Continue anyway - errors will be reported per-tool
        }
    }

    let server = GitHubProjectsMcpServer::new(config.github);

    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
