//! Common types shared across GitHub entities
//!
//! Users, labels, milestones, repository references and the GraphQL
//! connection/page wrappers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A user or bot (author, assignee, creator)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Actor {
    pub id: Option<String>,
    pub login: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: Option<String>,
    pub name: String,
    /// Hex without `#`
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Milestone {
    pub id: Option<String>,
    pub title: String,
    pub state: Option<String>,
    pub due_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryRef {
    pub id: Option<String>,
    pub name: String,
    /// e.g. "owner/repo"
    pub name_with_owner: Option<String>,
    pub url: Option<String>,
}

/// A bare `{ id }` selection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeId {
    pub id: String,
}

/// A bare `{ totalCount }` selection
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Count {
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// A GraphQL connection; null entries in `nodes` are dropped
#[derive(Debug, Clone, Deserialize)]
#[serde(
    rename_all = "camelCase",
    default,
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Connection<T> {
    #[serde(deserialize_with = "skip_null_nodes")]
    pub nodes: Vec<T>,
    pub total_count: u32,
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            total_count: 0,
            page_info: PageInfo::default(),
        }
    }
}

fn skip_null_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let nodes: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(nodes.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connection_skips_null_nodes() {
        let connection: Connection<Label> = serde_json::from_value(json!({
            "totalCount": 3,
            "nodes": [{"name": "bug"}, null, {"name": "docs", "color": "0075ca"}]
        }))
        .unwrap();
        assert_eq!(connection.total_count, 3);
        assert_eq!(connection.nodes.len(), 2);
        assert_eq!(connection.nodes[1].color.as_deref(), Some("0075ca"));
        assert!(!connection.page_info.has_next_page);
    }

    #[test]
    fn test_connection_null_nodes_list() {
        let connection: Connection<Actor> = serde_json::from_value(json!({"nodes": null})).unwrap();
        assert!(connection.nodes.is_empty());
    }

    #[test]
    fn test_milestone_due_on() {
        let milestone: Milestone =
            serde_json::from_value(json!({"title": "v1", "dueOn": "2024-03-01T00:00:00Z"})).unwrap();
        assert_eq!(milestone.due_on.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let milestone: Milestone = serde_json::from_value(json!({"title": "v1", "dueOn": null})).unwrap();
        assert!(milestone.due_on.is_none());
    }
}
