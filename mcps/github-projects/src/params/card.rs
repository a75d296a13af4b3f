//! Card-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Issue,
    PullRequest,
}

impl ContentType {
    /// GraphQL `__typename` of matching content
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "PullRequest",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Top,
    #[default]
    Bottom,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct AddCardToProjectParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Node ID of the issue or pull request to add")]
    pub content_id: String,
    #[schemars(description = "Column to place the card in")]
    pub column_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct MoveProjectCardParams {
    #[schemars(description = "Card ID (PVTI_...)")]
    pub card_id: String,
    #[schemars(description = "Target column ID")]
    pub column_id: String,
    #[schemars(description = "Position in the column: top or bottom (default: bottom)")]
    pub position: Option<Position>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateProjectCardParams {
    #[schemars(description = "Card ID (PVTI_...)")]
    pub card_id: String,
    #[schemars(description = "Field values keyed by field name, e.g. {\"Priority\": \"High\", \"Points\": 3}")]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RemoveCardFromProjectParams {
    #[schemars(description = "Card ID (PVTI_...)")]
    pub card_id: String,
    #[schemars(description = "Archive instead of deleting (default: false)")]
    pub archive: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct BulkMoveCardsParams {
    #[schemars(description = "Card IDs to move")]
    pub card_ids: Vec<String>,
    #[schemars(description = "Target column ID")]
    pub target_column_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectCardsParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Only cards in this column")]
    pub column_id: Option<String>,
    #[schemars(description = "Only cards with this content type: issue or pull_request")]
    pub content_type: Option<ContentType>,
    #[schemars(description = "Include archived cards (default: false)")]
    pub include_archived: Option<bool>,
    #[schemars(description = "Include issue/pull request content (default: true)")]
    pub include_content: Option<bool>,
    #[schemars(description = "Maximum number of cards (default: 20, max: 100)")]
    pub limit: Option<u32>,
    #[schemars(description = "Cursor from a previous page's end_cursor")]
    pub after: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectCardParams {
    #[schemars(description = "Card ID (PVTI_...)")]
    pub card_id: String,
}
