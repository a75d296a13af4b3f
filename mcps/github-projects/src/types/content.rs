//! Issue, pull request and draft issue content of an item

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::common::{Actor, Connection, Count, Label, Milestone, RepositoryRef};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueContent {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub body: Option<String>,
    /// OPEN or CLOSED
    pub state: Option<String>,
    pub state_reason: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub author: Option<Actor>,
    pub assignees: Connection<Actor>,
    pub labels: Connection<Label>,
    pub milestone: Option<Milestone>,
    pub comments: Count,
    pub reactions: Count,
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestContent {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub body: Option<String>,
    /// OPEN, CLOSED or MERGED
    pub state: Option<String>,
    pub url: Option<String>,
    pub is_draft: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub mergeable: Option<String>,
    pub review_decision: Option<String>,
    pub additions: u32,
    pub deletions: u32,
    pub changed_files: u32,
    pub head_ref_name: Option<String>,
    pub base_ref_name: Option<String>,
    pub author: Option<Actor>,
    pub assignees: Connection<Actor>,
    pub labels: Connection<Label>,
    pub milestone: Option<Milestone>,
    pub comments: Count,
    pub reviews: Count,
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftIssueContent {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub creator: Option<Actor>,
}

/// What a project item points at
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum ItemContent {
    Issue(IssueContent),
    PullRequest(PullRequestContent),
    DraftIssue(DraftIssueContent),
    #[serde(other)]
    Unknown,
}

impl ItemContent {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Issue(_) => "Issue",
            Self::PullRequest(_) => "PullRequest",
            Self::DraftIssue(_) => "DraftIssue",
            Self::Unknown => "Unknown",
        }
    }
}
