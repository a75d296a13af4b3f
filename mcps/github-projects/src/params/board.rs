//! Board-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Board layout to start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Kanban,
    Scrum,
    BugTriage,
    None,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Scrum => "scrum",
            Self::BugTriage => "bug_triage",
            Self::None => "none",
        }
    }
}

/// Which owner namespace to list boards from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    User,
    Organization,
    #[default]
    All,
}

impl OwnerType {
    pub fn includes_user(&self) -> bool {
        matches!(self, Self::User | Self::All)
    }

    pub fn includes_organization(&self) -> bool {
        matches!(self, Self::Organization | Self::All)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateProjectBoardParams {
    #[schemars(description = "Name of the project board")]
    pub name: String,
    #[schemars(description = "Owner login (user or organization) of the new board")]
    pub owner: String,
    #[schemars(description = "Board description, stored as the project readme")]
    pub description: Option<String>,
    #[schemars(description = "Repository name under the owner to link the board to")]
    pub repository: Option<String>,
    #[schemars(description = "Board template: kanban, scrum, bug_triage or none")]
    pub template: Option<Template>,
    #[schemars(description = "Make the board public (default: false)")]
    pub public: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateProjectBoardParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "New board title")]
    pub title: Option<String>,
    #[schemars(description = "New board description (project readme)")]
    pub description: Option<String>,
    #[schemars(description = "New short description")]
    pub short_description: Option<String>,
    #[schemars(description = "Whether the board is public")]
    pub public: Option<bool>,
    #[schemars(description = "Whether the board is closed")]
    pub closed: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeleteProjectBoardParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Must be true to delete the board")]
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectBoardsParams {
    #[schemars(description = "Owner login (user or organization)")]
    pub owner: String,
    #[schemars(description = "Owner type filter: user, organization or all (default: all)")]
    #[serde(rename = "type")]
    pub owner_type: Option<OwnerType>,
    #[schemars(description = "Include closed boards (default: false)")]
    pub include_closed: Option<bool>,
    #[schemars(description = "Maximum number of boards per owner (default: 20, max: 100)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectBoardParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Include field definitions (default: true)")]
    pub include_fields: Option<bool>,
    #[schemars(description = "Include item statistics (default: true)")]
    pub include_stats: Option<bool>,
}
