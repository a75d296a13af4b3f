//! Node lookups shared by several handlers
//!
//! Owners, repositories, the Status field of a board, column options and
//! the project an item belongs to.

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

use super::{tolerate_not_found, RemoteContext, ToolError, ToolResult};
use crate::github::{mutate, query, query_partial, GitHubResult, GraphQLClient};
use crate::graphql::errors::not_found_message;
use crate::graphql::fragments::{document, FIELD_DEFINITION_FRAGMENT};
use crate::types::item::STATUS_FIELD;
use crate::types::{Connection, FieldDefinition, FieldValue, NodeId, SingleSelectField};

const USER_ID_QUERY: &str = "query UserId($login: String!) { user(login: $login) { id } }";
const ORGANIZATION_ID_QUERY: &str = "query OrganizationId($login: String!) { organization(login: $login) { id } }";
const REPOSITORY_ID_QUERY: &str =
    "query RepositoryId($owner: String!, $name: String!) { repository(owner: $owner, name: $name) { id } }";

const STATUS_FIELD_QUERY: &str = r#"
query StatusField($id: ID!) {
  node(id: $id) {
    ... on ProjectV2 {
      id
      title
      field(name: "Status") { ...FieldDefinitionFragment }
    }
  }
}
"#;

const ITEM_STATUS_PAGE_QUERY: &str = r#"
query ItemStatuses($id: ID!, $after: String) {
  node(id: $id) {
    ... on ProjectV2 {
      items(first: 100, after: $after) {
        totalCount
        pageInfo { endCursor hasNextPage }
        nodes {
          id
          fieldValueByName(name: "Status") {
            __typename
            ... on ProjectV2ItemFieldSingleSelectValue { optionId name }
          }
        }
      }
    }
  }
}
"#;

const COLUMN_QUERY: &str = r#"
query ColumnOption($id: ID!) {
  node(id: $id) {
    ... on ProjectV2SingleSelectFieldOption {
      id
      name
      field {
        ... on ProjectV2SingleSelectField {
          id
          name
          project { id title }
        }
      }
    }
  }
}
"#;

const ITEM_PROJECT_QUERY: &str = r#"
query ItemProject($id: ID!) {
  node(id: $id) {
    ... on ProjectV2Item { id project { id } }
  }
}
"#;

const SET_FIELD_VALUE_MUTATION: &str = r#"
mutation SetItemFieldValue($input: UpdateProjectV2ItemFieldValueInput!) {
  updateProjectV2ItemFieldValue(input: $input) {
    projectV2Item { id }
  }
}
"#;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserData {
    user: Option<NodeId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrganizationData {
    organization: Option<NodeId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RepositoryData {
    repository: Option<NodeId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeData<T> {
    pub node: Option<T>,
}

fn present(id: Option<NodeId>) -> Option<String> {
    id.map(|n| n.id).filter(|id| !id.is_empty())
}

/// Owner login to node ID, trying the user namespace first
pub(crate) async fn resolve_owner_id(client: &dyn GraphQLClient, login: &str) -> ToolResult<String> {
    let vars = json!({ "login": login });

    // Only NOT_FOUND means "try the other namespace"
    let (user, errors) = query_partial::<UserData>(client, USER_ID_QUERY, vars.clone())
        .await
        .remote("resolve", "project owner")?;
    if let Some(id) = present(user.and_then(|d| d.user)) {
        return Ok(id);
    }
    let ignored = tolerate_not_found(errors, "resolve", "project owner")?;
    debug!(login, ignored, "owner is not a user, trying organization");

    let (org, errors) = query_partial::<OrganizationData>(client, ORGANIZATION_ID_QUERY, vars)
        .await
        .remote("resolve", "project owner")?;
    if let Some(id) = present(org.and_then(|d| d.organization)) {
        return Ok(id);
    }
    tolerate_not_found(errors, "resolve", "project owner")?;
    Err(ToolError::NotFound("owner not found".to_string()))
}

pub(crate) async fn resolve_repository_id(client: &dyn GraphQLClient, owner: &str, name: &str) -> ToolResult<String> {
    let data: RepositoryData = query(client, REPOSITORY_ID_QUERY, json!({ "owner": owner, "name": name }))
        .await
        .remote("resolve", "repository")?;
    present(data.repository).ok_or_else(|| ToolError::NotFound(format!("repository '{owner}/{name}' not found")))
}

// ============================================================================
// Status field and columns
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusFieldNode {
    id: String,
    title: String,
    field: Option<FieldDefinition>,
}

/// A board together with its Status field
#[derive(Debug, Clone)]
pub(crate) struct StatusBoard {
    pub id: String,
    pub title: String,
    pub field: SingleSelectField,
}

pub(crate) async fn fetch_status_field(client: &dyn GraphQLClient, board_id: &str) -> ToolResult<StatusBoard> {
    let doc = document(STATUS_FIELD_QUERY, &[FIELD_DEFINITION_FRAGMENT]);
    let data: NodeData<StatusFieldNode> = query(client, &doc, json!({ "id": board_id }))
        .await
        .remote("load", "project columns")?;

    let node = data
        .node
        .filter(|n| !n.id.is_empty())
        .ok_or_else(|| ToolError::NotFound(not_found_message("project", board_id)))?;

    match node.field {
        Some(FieldDefinition::SingleSelect(field)) => Ok(StatusBoard {
            id: node.id,
            title: node.title,
            field,
        }),
        _ => Err(ToolError::invalid(format!(
            "project '{board_id}' has no single-select {STATUS_FIELD} field; columns are the options of that field"
        ))),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatusItem {
    field_value_by_name: Option<FieldValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemsPage {
    items: Connection<StatusItem>,
}

/// Item counts per Status option plus the total item count
///
/// Pages through every item of the board, 100 at a time.
pub(crate) async fn count_items_by_status(
    client: &dyn GraphQLClient,
    board_id: &str,
) -> ToolResult<(HashMap<String, u32>, u32)> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut total = 0;
    let mut after: Option<String> = None;

    loop {
        let data: NodeData<ItemsPage> = query(client, ITEM_STATUS_PAGE_QUERY, json!({ "id": board_id, "after": after }))
            .await
            .remote("count", "project items")?;
        let Some(page) = data.node else {
            break;
        };

        total = page.items.total_count;
        for item in &page.items.nodes {
            if let Some(FieldValue::SingleSelect(value)) = &item.field_value_by_name {
                if let Some(option_id) = &value.option_id {
                    *counts.entry(option_id.clone()).or_default() += 1;
                }
            }
        }

        match page.items.page_info.end_cursor {
            Some(cursor) if page.items.page_info.has_next_page => after = Some(cursor),
            _ => break,
        }
    }

    Ok((counts, total))
}

/// The columns of a board with their card counts
#[derive(Debug, Clone)]
pub(crate) struct BoardColumns {
    pub board: StatusBoard,
    pub columns: Vec<Value>,
    pub total_items: u32,
}

pub(crate) async fn load_board_columns(client: &dyn GraphQLClient, board_id: &str) -> ToolResult<BoardColumns> {
    let board = fetch_status_field(client, board_id).await?;
    let (counts, total_items) = count_items_by_status(client, &board.id).await?;

    let columns = board
        .field
        .options
        .iter()
        .enumerate()
        .map(|(position, option)| {
            json!({
                "id": option.id,
                "name": option.name,
                "description": option.description.clone().unwrap_or_default(),
                "color": option.color.clone().unwrap_or_default(),
                "position": position,
                "item_count": counts.get(&option.id).copied().unwrap_or(0),
            })
        })
        .collect();

    Ok(BoardColumns {
        board,
        columns,
        total_items,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnNode {
    id: String,
    name: String,
    field: Option<ColumnField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnField {
    id: String,
    project: Option<NodeId>,
}

/// Where a column lives
#[derive(Debug, Clone)]
pub(crate) struct ColumnTarget {
    pub option_id: String,
    pub name: String,
    pub field_id: String,
    pub project_id: String,
}

pub(crate) async fn resolve_column(client: &dyn GraphQLClient, column_id: &str) -> ToolResult<ColumnTarget> {
    let data: NodeData<ColumnNode> = query(client, COLUMN_QUERY, json!({ "id": column_id }))
        .await
        .remote("resolve", "column")?;

    let not_found = || ToolError::NotFound(not_found_message("column", column_id));
    let node = data.node.filter(|n| !n.id.is_empty()).ok_or_else(not_found)?;
    let field = node.field.filter(|f| !f.id.is_empty()).ok_or_else(not_found)?;
    let project_id = present(field.project).ok_or_else(not_found)?;

    Ok(ColumnTarget {
        option_id: node.id,
        name: node.name,
        field_id: field.id,
        project_id,
    })
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemProjectNode {
    id: String,
    project: Option<NodeId>,
}

/// ID of the project owning an item
pub(crate) async fn resolve_item_project(client: &dyn GraphQLClient, item_id: &str) -> ToolResult<String> {
    let data: NodeData<ItemProjectNode> = query(client, ITEM_PROJECT_QUERY, json!({ "id": item_id }))
        .await
        .remote("resolve", "card")?;
    data.node
        .filter(|n| !n.id.is_empty())
        .and_then(|n| present(n.project))
        .ok_or_else(|| ToolError::NotFound(not_found_message("card", item_id)))
}

/// Set one field value of an item
pub(crate) async fn set_field_value(
    client: &dyn GraphQLClient,
    project_id: &str,
    item_id: &str,
    field_id: &str,
    value: Value,
) -> GitHubResult<()> {
    let input = json!({
        "projectId": project_id,
        "itemId": item_id,
        "fieldId": field_id,
        "value": value,
    });
    mutate::<Value>(client, SET_FIELD_VALUE_MUTATION, json!({ "input": input })).await?;
    Ok(())
}

/// Put an item into a column
pub(crate) async fn move_to_column(client: &dyn GraphQLClient, item_id: &str, column: &ColumnTarget) -> GitHubResult<()> {
    set_field_value(
        client,
        &column.project_id,
        item_id,
        &column.field_id,
        json!({ "singleSelectOptionId": column.option_id }),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::fragments::tests::assert_closed;

    #[test]
    fn test_documents_are_closed() {
        assert_closed(&document(STATUS_FIELD_QUERY, &[FIELD_DEFINITION_FRAGMENT]));
        for doc in [
            USER_ID_QUERY,
            ORGANIZATION_ID_QUERY,
            REPOSITORY_ID_QUERY,
            ITEM_STATUS_PAGE_QUERY,
            COLUMN_QUERY,
            ITEM_PROJECT_QUERY,
            SET_FIELD_VALUE_MUTATION,
        ] {
            assert_closed(doc);
        }
    }
}
