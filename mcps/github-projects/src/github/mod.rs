//! GitHub GraphQL access
//!
//! A [`GraphQLClient`] executes a single request. Handlers never construct
//! one directly: they ask a [`ClientFactory`] for a fresh client on every
//! tool invocation. Two transports are provided, the `gh` CLI (reusing its
//! stored credentials) and plain HTTPS with a token from the environment.

pub mod client;
pub mod error;
pub mod factory;
pub mod gh;
pub mod http;

pub use client::{mutate, query, query_partial, GraphQLClient, GraphQLRequest, GraphQLResponse};
pub use error::{GitHubError, GitHubResult};
pub use factory::{ClientFactory, TransportFactory};
pub use gh::{check_gh_available, GhCliClient};
pub use http::HttpClient;
