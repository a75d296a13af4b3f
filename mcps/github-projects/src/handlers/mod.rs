//! Handler implementations for GitHub Projects MCP tools
//!
//! Organized by domain: board, column, card. Each handler takes the client
//! factory and its decoded parameters and returns a [`ToolResult`]; the
//! server turns that into an MCP response with [`respond`].

mod board;
mod card;
mod column;
mod lookup;

pub use board::*;
pub use card::*;
pub use column::*;

use rmcp::{model::CallToolResult, ErrorData as McpError};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::github::{ClientFactory, GitHubError, GitHubResult, GraphQLClient};
use crate::graphql::{
    format_graphql_error, parse_graphql_error, permission_denied_message, GraphQLError, GraphQLErrors, InvalidId,
};
use crate::result::{internal_error, json_error, json_success, tool_error};

/// Why a handler did not produce its result
#[derive(Debug)]
pub enum ToolError {
    /// Rejected before any network call
    Invalid(String),
    /// A GraphQL round trip failed
    Remote {
        action: &'static str,
        resource: &'static str,
        source: GitHubError,
    },
    /// A lookup came back empty
    NotFound(String),
    /// Operation GitHub cannot perform; the body describes the proposed change
    Unsupported(Value),
    /// Protocol-level failure, e.g. no client could be obtained
    Fatal(McpError),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Text reported to the caller for tool-level failures
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Invalid(message) | Self::NotFound(message) => Some(message.clone()),
            Self::Remote {
                action,
                resource,
                source,
            } => Some(remote_message(action, resource, source)),
            Self::Unsupported(body) => body.get("message").and_then(Value::as_str).map(str::to_string),
            Self::Fatal(_) => None,
        }
    }
}

impl From<InvalidId> for ToolError {
    fn from(err: InvalidId) -> Self {
        Self::Invalid(err.to_string())
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

fn remote_message(action: &str, resource: &str, source: &GitHubError) -> String {
    let detail = format_graphql_error(source);
    let forbidden = parse_graphql_error(source).is_some_and(|errors| errors.is_forbidden());
    if forbidden {
        format!(
            "failed to {action} {resource}: {detail}\n{}",
            permission_denied_message(action, resource)
        )
    } else {
        format!("failed to {action} {resource}: {detail}")
    }
}

/// Attach the failed action to a client error
pub(crate) trait RemoteContext<T> {
    fn remote(self, action: &'static str, resource: &'static str) -> ToolResult<T>;
}

impl<T> RemoteContext<T> for GitHubResult<T> {
    fn remote(self, action: &'static str, resource: &'static str) -> ToolResult<T> {
        self.map_err(|source| ToolError::Remote {
            action,
            resource,
            source,
        })
    }
}

/// Accept a partial response whose only errors are NOT_FOUND
///
/// Returns how many errors were ignored; any other error fails the call.
pub(crate) fn tolerate_not_found(
    errors: Vec<GraphQLError>,
    action: &'static str,
    resource: &'static str,
) -> ToolResult<usize> {
    let (ignored, fatal): (Vec<_>, Vec<_>) = errors.into_iter().partition(GraphQLError::is_not_found);
    if fatal.is_empty() {
        Ok(ignored.len())
    } else {
        Err(ToolError::Remote {
            action,
            resource,
            source: GitHubError::GraphQL(GraphQLErrors::from(fatal)),
        })
    }
}

/// Fresh client for this invocation
pub(crate) fn acquire(factory: &dyn ClientFactory) -> ToolResult<Arc<dyn GraphQLClient>> {
    factory
        .client()
        .map_err(|e| ToolError::Fatal(internal_error(format!("failed to get GitHub GraphQL client: {e}"))))
}

/// Convert a handler outcome into the MCP response
pub fn respond(result: ToolResult<Value>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(data) => json_success(&data),
        Err(ToolError::Unsupported(body)) => json_error(&body),
        Err(ToolError::Fatal(err)) => Err(err),
        Err(err) => {
            let message = err.message().unwrap_or_default();
            debug!(error = %message, "tool call failed");
            Ok(tool_error(message))
        }
    }
}
