//! GitHub Projects MCP Library
//!
//! MCP-compatible tools for GitHub Projects (v2) over the GraphQL API.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use github_projects_mcp::{config::GitHubConfig, GitHubProjectsMcpServer};
//!
//! let server = GitHubProjectsMcpServer::new(GitHubConfig::default());
//! // Use with in-memory transport or serve via stdio
//! ```
//!
//! # Features
//! - Boards: create, update, delete, list, get
//! - Columns (Status field options): list, get; create/update/delete/reorder are proposed only
//! - Cards: add, move, update fields, remove/archive, bulk move, list, get
//!
//! # Requirements
//! - `gh` CLI installed and authenticated with the `project` scope, or a
//!   token in `GITHUB_TOKEN` with the `http` transport

pub mod config;
pub mod github;
pub mod graphql;
pub mod handlers;
pub mod init;
pub mod normalize;
pub mod params;
pub mod result;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::GitHubProjectsMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;
