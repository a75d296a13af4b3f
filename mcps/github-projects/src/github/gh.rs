//! GraphQL over the `gh` CLI
//!
//! Requests are sent with `gh api graphql --input -`, the request body being
//! written to the child's stdin. `gh` exits non-zero when the response
//! carries GraphQL errors but still prints the body on stdout, so that body
//! is parsed before falling back to a plain command failure.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use super::client::{GraphQLClient, GraphQLRequest, GraphQLResponse};
use super::error::{GitHubError, GitHubResult};

/// Client that shells out to an authenticated `gh`
#[derive(Debug, Clone, Default)]
pub struct GhCliClient {
    hostname: Option<String>,
}

impl GhCliClient {
    /// `hostname` selects a GitHub Enterprise host (`gh --hostname`)
    pub fn new(hostname: Option<String>) -> Self {
        Self { hostname }
    }

    fn args(&self) -> Vec<&str> {
        let mut args = vec!["api", "graphql", "--input", "-"];
        if let Some(host) = self.hostname.as_deref() {
            args.push("--hostname");
            args.push(host);
        }
        args
    }
}

fn spawn_error(e: std::io::Error) -> GitHubError {
    if e.kind() == std::io::ErrorKind::NotFound {
        GitHubError::NotFound
    } else {
        GitHubError::SpawnError(e)
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("gh auth login") || stderr.contains("not logged in")
}

#[async_trait]
impl GraphQLClient for GhCliClient {
    #[instrument(skip(self, request), fields(operation = request.operation_name().unwrap_or("anonymous")))]
    async fn execute(&self, request: GraphQLRequest) -> GitHubResult<GraphQLResponse> {
        let body = serde_json::to_vec(&request)?;
        let args = self.args();

        debug!("executing: gh {}", args.join(" "));

        let mut child = Command::new("gh")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // stdin must be closed before waiting or gh blocks on input
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&body).await?;
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let code = output.status.code().unwrap_or(-1);

            if is_auth_failure(&stderr) {
                error!("gh authentication required");
                return Err(GitHubError::NotAuthenticated);
            }

            if let Ok(response) = serde_json::from_slice::<GraphQLResponse>(&output.stdout) {
                if !response.errors.is_empty() {
                    debug!(code, errors = response.errors.len(), "gh returned GraphQL errors");
                    return Ok(response);
                }
            }

            error!(code, stderr = %stderr, "gh command failed");
            return Err(GitHubError::CommandFailed { code, stderr });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Check if gh CLI is available and authenticated
///
/// Used as a startup probe; failures are reported per tool call as well.
#[instrument]
pub async fn check_gh_available(hostname: Option<&str>) -> GitHubResult<()> {
    debug!("checking gh availability");

    let mut args = vec!["auth", "status"];
    if let Some(host) = hostname {
        args.push("--hostname");
        args.push(host);
    }

    let output = Command::new("gh")
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?
        .wait_with_output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(auth_status_failure(output.status.code().unwrap_or(-1), stderr));
    }

    debug!("gh is available and authenticated");
    Ok(())
}

/// Error for a failed `gh auth status`
fn auth_status_failure(code: i32, stderr: String) -> GitHubError {
    if is_auth_failure(&stderr) {
        GitHubError::NotAuthenticated
    } else {
        GitHubError::CommandFailed { code, stderr }
    }
}
