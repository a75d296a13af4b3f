//! The GraphQL client capability and typed execution helpers

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{GitHubError, GitHubResult};
use crate::graphql::errors::{GraphQLError, GraphQLErrors};

/// A GraphQL document together with its variables
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }

    /// Name of the first operation in the document, if it has one
    pub fn operation_name(&self) -> Option<&str> {
        let rest = self.query.trim_start();
        let rest = rest
            .strip_prefix("query")
            .or_else(|| rest.strip_prefix("mutation"))?
            .trim_start();
        let end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    }
}

/// Raw GraphQL response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Strict decoding: any reported error fails the whole operation
    pub fn into_data<T: DeserializeOwned>(self) -> GitHubResult<T> {
        if !self.errors.is_empty() {
            return Err(GitHubError::GraphQL(GraphQLErrors {
                errors: self.errors,
            }));
        }
        match self.data {
            Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
            _ => Err(GitHubError::MissingData),
        }
    }

    /// Lenient decoding: returns whatever data came back next to the errors
    pub fn into_partial<T: DeserializeOwned>(self) -> GitHubResult<(Option<T>, Vec<GraphQLError>)> {
        let data = match self.data {
            Some(data) if !data.is_null() => Some(serde_json::from_value(data)?),
            _ if self.errors.is_empty() => return Err(GitHubError::MissingData),
            _ => None,
        };
        Ok((data, self.errors))
    }
}

/// Anything able to execute a GraphQL request against GitHub
#[async_trait]
pub trait GraphQLClient: Send + Sync {
    async fn execute(&self, request: GraphQLRequest) -> GitHubResult<GraphQLResponse>;
}

/// Run a query and decode its data, failing on any GraphQL error
pub async fn query<T: DeserializeOwned>(
    client: &dyn GraphQLClient,
    document: &str,
    variables: Value,
) -> GitHubResult<T> {
    client
        .execute(GraphQLRequest::new(document, variables))
        .await?
        .into_data()
}

/// Run a mutation and decode its payload
pub async fn mutate<T: DeserializeOwned>(
    client: &dyn GraphQLClient,
    document: &str,
    variables: Value,
) -> GitHubResult<T> {
    query(client, document, variables).await
}

/// Run a query whose data is useful even when some errors are reported
pub async fn query_partial<T: DeserializeOwned>(
    client: &dyn GraphQLClient,
    document: &str,
    variables: Value,
) -> GitHubResult<(Option<T>, Vec<GraphQLError>)> {
    client
        .execute(GraphQLRequest::new(document, variables))
        .await?
        .into_partial()
}
