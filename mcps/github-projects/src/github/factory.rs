//! Per-invocation client acquisition

use std::sync::Arc;

use super::client::GraphQLClient;
use super::error::{GitHubError, GitHubResult};
use super::gh::GhCliClient;
use super::http::HttpClient;
use crate::config::{GitHubConfig, Transport};

/// Source of GraphQL clients, asked once per tool call
pub trait ClientFactory: Send + Sync {
    fn client(&self) -> GitHubResult<Arc<dyn GraphQLClient>>;
}

impl<F> ClientFactory for F
where
    F: Fn() -> GitHubResult<Arc<dyn GraphQLClient>> + Send + Sync,
{
    fn client(&self) -> GitHubResult<Arc<dyn GraphQLClient>> {
        self()
    }
}

/// Builds a client for the configured transport
#[derive(Debug, Clone)]
pub struct TransportFactory {
    config: GitHubConfig,
}

impl TransportFactory {
    pub fn new(config: GitHubConfig) -> Self {
        Self { config }
    }

    fn token(&self) -> GitHubResult<String> {
        std::env::var(&self.config.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| GitHubError::MissingToken(self.config.token_env.clone()))
    }
}

impl ClientFactory for TransportFactory {
    fn client(&self) -> GitHubResult<Arc<dyn GraphQLClient>> {
        match self.config.transport {
            Transport::Gh => Ok(Arc::new(GhCliClient::new(self.config.hostname.clone()))),
            Transport::Http => {
                let client = HttpClient::new(&self.config.api_url, self.token()?, &self.config.user_agent)?;
                Ok(Arc::new(client))
            }
        }
    }
}
