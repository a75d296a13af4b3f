//! Scripted GraphQL client for handler tests
//!
//! Responses are replayed in order; every request is recorded so tests can
//! assert on the documents and variables that were sent.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use github_projects_mcp::github::{ClientFactory, GitHubError, GitHubResult, GraphQLClient, GraphQLRequest, GraphQLResponse};
use github_projects_mcp::graphql::{GraphQLError, GraphQLErrors};

#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<GitHubResult<GraphQLResponse>>>,
    requests: Mutex<Vec<GraphQLRequest>>,
}

impl ScriptedClient {
    /// Queue a successful response with this `data`
    pub fn data(&self, data: Value) -> &Self {
        self.push(Ok(GraphQLResponse::with_data(data)))
    }

    /// Queue a response carrying only GraphQL errors
    pub fn errors(&self, messages: &[&str]) -> &Self {
        let errors = messages.iter().map(|m| GraphQLError::new(*m)).collect();
        self.push(Ok(GraphQLResponse { data: None, errors }))
    }

    /// Queue a response with partial data and typed errors
    pub fn partial(&self, data: Value, errors: Vec<GraphQLError>) -> &Self {
        self.push(Ok(GraphQLResponse {
            data: Some(data),
            errors,
        }))
    }

    /// Queue a transport-level failure
    pub fn fail(&self, error: GitHubError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, response: GitHubResult<GraphQLResponse>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<GraphQLRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose document contains `needle`
    pub fn requests_containing(&self, needle: &str) -> Vec<GraphQLRequest> {
        self.requests().into_iter().filter(|r| r.query.contains(needle)).collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphQLClient for ScriptedClient {
    async fn execute(&self, request: GraphQLRequest) -> GitHubResult<GraphQLResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(GitHubError::GraphQL(GraphQLErrors::from(vec![GraphQLError::new(format!(
                "unscripted request: {}",
                request.query
            ))])))
        })
    }
}

/// Factory handing out the shared scripted client and counting acquisitions
#[derive(Default)]
pub struct StubFactory {
    pub client: Arc<ScriptedClient>,
    acquisitions: AtomicUsize,
}

impl StubFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl ClientFactory for StubFactory {
    fn client(&self) -> GitHubResult<Arc<dyn GraphQLClient>> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(self.client.clone())
    }
}

/// A NOT_FOUND error as GitHub reports it for a missing namespace
pub fn not_found(message: &str) -> GraphQLError {
    GraphQLError {
        message: message.to_string(),
        error_type: Some("NOT_FOUND".to_string()),
        ..Default::default()
    }
}
