//! GraphQL over HTTPS with a bearer token

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument};

use super::client::{GraphQLClient, GraphQLRequest, GraphQLResponse};
use super::error::{GitHubError, GitHubResult};

/// Client posting requests straight to the GraphQL endpoint
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpClient {
    pub fn new(endpoint: &str, token: String, user_agent: &str) -> GitHubResult<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token,
        })
    }
}

#[async_trait]
impl GraphQLClient for HttpClient {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, operation = request.operation_name().unwrap_or("anonymous")))]
    async fn execute(&self, request: GraphQLRequest) -> GitHubResult<GraphQLResponse> {
        debug!("posting GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "GitHub API request failed");
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GraphQLResponse>().await?)
    }
}
