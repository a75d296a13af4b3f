//! Configuration loading for github-projects-mcp
//!
//! Configuration is loaded from:
//! 1. An explicit path (`--config` / `GITHUB_PROJECTS_CONFIG_PATH`)
//! 2. ~/.binks/github-projects.toml
//! 3. Default values
//!
//! `GITHUB_GRAPHQL_URL` overrides the HTTP endpoint afterwards; the CLI
//! flags handled in `main` have the final word.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub connection settings
    #[serde(default)]
    pub github: GitHubConfig,
}

/// How GraphQL requests reach GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `gh api graphql`, using the CLI's stored credentials
    #[default]
    Gh,
    /// Direct HTTPS with a token from the environment
    Http,
}

/// GitHub connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub transport: Transport,
    /// GitHub Enterprise host passed to `gh --hostname`
    #[serde(default)]
    pub hostname: Option<String>,
    /// GraphQL endpoint for the HTTP transport
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the token for the HTTP transport
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    format!("github-projects-mcp/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            hostname: None,
            api_url: default_api_url(),
            token_env: default_token_env(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = explicit.map(Path::to_path_buf).or_else(Self::default_path);

        let mut config = match config_path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(&path)?)?
            }
            Some(_) => {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var("GITHUB_GRAPHQL_URL") {
            config.github.api_url = url;
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn default_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".binks").join("github-projects.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.transport, Transport::Gh);
        assert_eq!(config.github.api_url, "https://api.github.com/graphql");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert!(config.github.hostname.is_none());
        assert!(config.github.user_agent.starts_with("github-projects-mcp/"));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::from_toml_str(
            r#"
            [github]
            transport = "http"
            token_env = "GH_PROJECTS_TOKEN"
            "#,
        )
        .unwrap();
        assert_eq!(config.github.transport, Transport::Http);
        assert_eq!(config.github.token_env, "GH_PROJECTS_TOKEN");
        assert_eq!(config.github.api_url, "https://api.github.com/graphql");
    }

    #[test]
    fn test_parse_enterprise_host() {
        let config = Config::from_toml_str("[github]\nhostname = \"github.example.com\"\n").unwrap();
        assert_eq!(config.github.transport, Transport::Gh);
        assert_eq!(config.github.hostname.as_deref(), Some("github.example.com"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.github.transport, Transport::Gh);
    }

    #[test]
    fn test_unknown_transport_rejected() {
        assert!(Config::from_toml_str("[github]\ntransport = \"ssh\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_uses_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/github-projects.toml"))).unwrap();
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
    }
}
