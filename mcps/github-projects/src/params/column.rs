//! Column-related parameter types
//!
//! Columns are the options of a board's "Status" field.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectColumnsParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectColumnParams {
    #[schemars(description = "Column ID (Status option node ID)")]
    pub column_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateProjectColumnParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Column name")]
    pub name: String,
    #[schemars(description = "Column description")]
    pub description: Option<String>,
    #[schemars(description = "Work-in-progress limit")]
    pub limit: Option<u32>,
    #[schemars(description = "Column color (GRAY, BLUE, GREEN, YELLOW, ORANGE, RED, PINK, PURPLE)")]
    pub color: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateProjectColumnParams {
    #[schemars(description = "Column ID")]
    pub column_id: String,
    #[schemars(description = "New column name")]
    pub name: Option<String>,
    #[schemars(description = "New column description")]
    pub description: Option<String>,
    #[schemars(description = "New work-in-progress limit")]
    pub limit: Option<u32>,
    #[schemars(description = "New column color")]
    pub color: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeleteProjectColumnParams {
    #[schemars(description = "Column ID")]
    pub column_id: String,
    #[schemars(description = "Archive the column's cards instead of moving them (default: true)")]
    pub archive_cards: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReorderProjectColumnsParams {
    #[schemars(description = "Project board ID (PVT_...)")]
    pub board_id: String,
    #[schemars(description = "Column IDs in the desired order")]
    pub column_order: Vec<String>,
}
