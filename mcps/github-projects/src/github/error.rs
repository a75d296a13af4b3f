//! Error types for GitHub GraphQL operations
//!
//! Covers both transports (process failures from `gh`, HTTP failures from
//! `reqwest`) as well as errors reported inside a GraphQL response body.

use thiserror::Error;

use crate::graphql::errors::GraphQLErrors;

/// Errors that can occur while talking to the GitHub GraphQL API
#[derive(Error, Debug)]
pub enum GitHubError {
    /// The gh command failed with a non-zero exit code
    #[error("gh command failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Exit code from the gh process
        code: i32,
        /// Standard error output from gh
        stderr: String,
    },

    /// Failed to spawn the gh process or talk to its pipes
    #[error("failed to spawn gh process: {0}")]
    SpawnError(#[from] std::io::Error),

    /// gh CLI is not installed or not in PATH
    #[error("gh CLI not found - ensure gh is installed and in PATH")]
    NotFound,

    /// gh CLI is not authenticated
    #[error("gh CLI not authenticated - run 'gh auth login' first")]
    NotAuthenticated,

    /// The HTTP transport found no token in the configured variable
    #[error("no GitHub token found in environment variable {0}")]
    MissingToken(String),

    /// The HTTP request itself failed
    #[error("HTTP request to GitHub failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success HTTP status
    #[error("GitHub API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, usually a JSON error document
        body: String,
    },

    /// The response carried a non-empty `errors` array
    #[error("{0}")]
    GraphQL(GraphQLErrors),

    /// The response body was not the JSON shape we expected
    #[error("failed to parse GraphQL response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The response had neither data nor errors
    #[error("GraphQL response contained no data")]
    MissingData,
}

/// Result type alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;
