//! Card (project item) handlers

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::lookup::{move_to_column, resolve_column, resolve_item_project, set_field_value, NodeData};
use super::{acquire, RemoteContext, ToolError, ToolResult};
use crate::github::{mutate, query, ClientFactory, GitHubError};
use crate::graphql::errors::{format_graphql_error, not_found_message};
use crate::graphql::fragments::{build_project_cards_query, document, project_item_fragments, FIELD_DEFINITION_FRAGMENT};
use crate::graphql::ids::{validate_column_id, validate_item_id, validate_project_id};
use crate::normalize::{card_detail, card_summary};
use crate::params::{
    effective_limit, non_empty, AddCardToProjectParams, BulkMoveCardsParams, GetProjectCardParams,
    ListProjectCardsParams, MoveProjectCardParams, Position, RemoveCardFromProjectParams, UpdateProjectCardParams,
};
use crate::types::{Connection, FieldDefinition, ItemContent, ProjectItem};

const ADD_ITEM_MUTATION: &str = r#"
mutation AddProjectItem($input: AddProjectV2ItemByIdInput!) {
  addProjectV2ItemById(input: $input) {
    item { id }
  }
}
"#;

const ITEM_POSITION_MUTATION: &str = r#"
mutation MoveItemPosition($input: UpdateProjectV2ItemPositionInput!) {
  updateProjectV2ItemPosition(input: $input) {
    clientMutationId
  }
}
"#;

const ARCHIVE_ITEM_MUTATION: &str = r#"
mutation ArchiveProjectItem($input: ArchiveProjectV2ItemInput!) {
  archiveProjectV2Item(input: $input) {
    item { id isArchived }
  }
}
"#;

const DELETE_ITEM_MUTATION: &str = r#"
mutation DeleteProjectItem($input: DeleteProjectV2ItemInput!) {
  deleteProjectV2Item(input: $input) {
    deletedItemId
  }
}
"#;

const ITEM_FIELDS_QUERY: &str = r#"
query ItemFields($id: ID!) {
  node(id: $id) {
    ... on ProjectV2Item {
      id
      project {
        id
        fields(first: 50) {
          nodes { ...FieldDefinitionFragment }
        }
      }
    }
  }
}
"#;

const ITEM_QUERY: &str = r#"
query ProjectItem($id: ID!) {
  node(id: $id) {
    ... on ProjectV2Item {
      ...ProjectItemFragment
      project { id title url }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemData {
    add_project_v2_item_by_id: AddItemPayload,
}

#[derive(Debug, Deserialize)]
struct AddItemPayload {
    item: Option<ItemId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemId {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemFieldsNode {
    id: String,
    project: Option<ItemFieldsProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemFieldsProject {
    id: String,
    fields: Connection<FieldDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemsNode {
    id: String,
    title: String,
    items: Connection<ProjectItem>,
}

// ============================================================================
// add / move / update / remove
// ============================================================================

pub async fn add_card_to_project(factory: &dyn ClientFactory, params: AddCardToProjectParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    let content_id =
        non_empty(Some(params.content_id)).ok_or_else(|| ToolError::invalid("content_id must not be empty"))?;
    let column_id = non_empty(params.column_id);
    if let Some(column_id) = &column_id {
        validate_column_id(column_id)?;
    }

    let client = acquire(factory)?;
    let client = client.as_ref();

    let added: AddItemData = mutate(
        client,
        ADD_ITEM_MUTATION,
        json!({ "input": { "projectId": params.board_id, "contentId": content_id } }),
    )
    .await
    .remote("add", "card to project")?;
    let card_id = added
        .add_project_v2_item_by_id
        .item
        .map(|i| i.id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ToolError::Remote {
            action: "add",
            resource: "card to project",
            source: GitHubError::MissingData,
        })?;

    let mut result = json!({
        "success": true,
        "card_id": card_id,
        "board_id": params.board_id,
        "content_id": content_id,
    });

    if let Some(column_id) = column_id {
        result["column_id"] = json!(column_id);
        let placed = match resolve_column(client, &column_id).await {
            Ok(column) => move_to_column(client, &card_id, &column)
                .await
                .map_err(|e| format_graphql_error(&e)),
            Err(err) => Err(err.message().unwrap_or_default()),
        };
        if let Err(reason) = placed {
            warn!(card_id = %card_id, column_id = %column_id, "card added but column placement failed");
            result["column_warning"] = json!(format!("card added, but moving it to the column failed: {reason}"));
        }
    }

    Ok(result)
}

pub async fn move_project_card(factory: &dyn ClientFactory, params: MoveProjectCardParams) -> ToolResult<Value> {
    validate_item_id(&params.card_id)?;
    validate_column_id(&params.column_id)?;
    let position = params.position.unwrap_or_default();

    let client = acquire(factory)?;
    let client = client.as_ref();

    let column = resolve_column(client, &params.column_id).await?;
    move_to_column(client, &params.card_id, &column)
        .await
        .remote("move", "card")?;

    let mut result = json!({
        "success": true,
        "card_id": params.card_id,
        "column_id": column.option_id,
        "column_name": column.name,
        "project_id": column.project_id,
        "position": position.as_str(),
        "message": format!("Card moved to column '{}'", column.name),
    });

    if position == Position::Top {
        // No afterId puts the item first
        let input = json!({ "projectId": column.project_id, "itemId": params.card_id });
        if let Err(err) = mutate::<Value>(client, ITEM_POSITION_MUTATION, json!({ "input": input })).await {
            warn!(card_id = %params.card_id, error = %err, "card moved but repositioning failed");
            result["position_warning"] = json!(format!(
                "card moved, but placing it at the top failed: {}",
                format_graphql_error(&err)
            ));
        }
    }

    Ok(result)
}

/// Mutation value for a requested field update
fn field_update_value(field: &FieldDefinition, value: &Value) -> Value {
    match value {
        Value::String(s) => match field {
            FieldDefinition::SingleSelect(select) => match select.option(s) {
                Some(option) => json!({ "singleSelectOptionId": option.id }),
                None => json!({ "text": s }),
            },
            FieldDefinition::Iteration(_) => json!({ "iterationId": s }),
            _ if field.data_type() == Some("DATE") => json!({ "date": s }),
            _ => json!({ "text": s }),
        },
        Value::Number(n) => json!({ "number": n }),
        Value::Bool(b) => json!({ "text": b.to_string() }),
        other => other.clone(),
    }
}

pub async fn update_project_card(factory: &dyn ClientFactory, params: UpdateProjectCardParams) -> ToolResult<Value> {
    validate_item_id(&params.card_id)?;
    if params.fields.is_empty() {
        return Err(ToolError::invalid("fields must contain at least one field to update"));
    }

    let client = acquire(factory)?;
    let client = client.as_ref();

    let doc = document(ITEM_FIELDS_QUERY, &[FIELD_DEFINITION_FRAGMENT]);
    let data: NodeData<ItemFieldsNode> = query(client, &doc, json!({ "id": params.card_id }))
        .await
        .remote("load", "card fields")?;
    let project = data
        .node
        .filter(|n| !n.id.is_empty())
        .and_then(|n| n.project)
        .filter(|p| !p.id.is_empty())
        .ok_or_else(|| ToolError::NotFound(not_found_message("card", &params.card_id)))?;

    let mut updates = Vec::new();
    for (name, requested) in &params.fields {
        let Some(field) = project.fields.nodes.iter().find(|f| f.name() == Some(name.as_str())) else {
            debug!(field = %name, "skipping unknown field");
            continue;
        };
        let Some(field_id) = field.id() else {
            continue;
        };

        let value = field_update_value(field, requested);
        match set_field_value(client, &project.id, &params.card_id, field_id, value).await {
            Ok(()) => updates.push(json!({ "field": name, "value": requested, "status": "updated" })),
            Err(err) => {
                warn!(field = %name, error = %err, "field update failed");
                updates.push(json!({
                    "field": name,
                    "value": requested,
                    "status": "failed",
                    "error": format_graphql_error(&err),
                }));
            }
        }
    }

    let updated = updates.iter().filter(|u| u["status"] == "updated").count();
    let failed = updates.len() - updated;
    Ok(json!({
        "success": failed == 0,
        "card_id": params.card_id,
        "project_id": project.id,
        "updates": updates,
        "message": format!("Updated {updated} field(s), {failed} failed"),
    }))
}

pub async fn remove_card_from_project(
    factory: &dyn ClientFactory,
    params: RemoveCardFromProjectParams,
) -> ToolResult<Value> {
    validate_item_id(&params.card_id)?;
    let archive = params.archive.unwrap_or(false);

    let client = acquire(factory)?;
    let client = client.as_ref();

    let project_id = resolve_item_project(client, &params.card_id).await?;
    let input = json!({ "input": { "projectId": project_id, "itemId": params.card_id } });

    if archive {
        mutate::<Value>(client, ARCHIVE_ITEM_MUTATION, input)
            .await
            .remote("archive", "card")?;
        Ok(json!({
            "success": true,
            "card_id": params.card_id,
            "archived": true,
            "message": "Card archived",
        }))
    } else {
        mutate::<Value>(client, DELETE_ITEM_MUTATION, input)
            .await
            .remote("remove", "card")?;
        Ok(json!({
            "success": true,
            "card_id": params.card_id,
            "deleted": true,
            "message": "Card removed from project",
        }))
    }
}

pub async fn bulk_move_cards(factory: &dyn ClientFactory, params: BulkMoveCardsParams) -> ToolResult<Value> {
    if params.card_ids.is_empty() {
        return Err(ToolError::invalid("card_ids must contain at least one card ID"));
    }
    validate_column_id(&params.target_column_id)?;
    for card_id in &params.card_ids {
        validate_item_id(card_id)?;
    }

    let client = acquire(factory)?;
    let client = client.as_ref();
    let column = resolve_column(client, &params.target_column_id).await?;

    let mut results = Vec::with_capacity(params.card_ids.len());
    let mut moved = 0;
    for card_id in &params.card_ids {
        match move_to_column(client, card_id, &column).await {
            Ok(()) => {
                moved += 1;
                results.push(json!({ "card_id": card_id, "status": "moved" }));
            }
            Err(err) => {
                warn!(card_id = %card_id, error = %err, "bulk move failed for card");
                results.push(json!({
                    "card_id": card_id,
                    "status": "failed",
                    "error": format_graphql_error(&err),
                }));
            }
        }
    }

    let total = params.card_ids.len();
    let failed = total - moved;
    Ok(json!({
        "success": moved > 0,
        "total_cards": total,
        "moved_count": moved,
        "failed_count": failed,
        "target_column_id": params.target_column_id,
        "results": results,
        "message": format!("Moved {moved} of {total} cards to '{}'", column.name),
    }))
}

// ============================================================================
// list / get
// ============================================================================

pub async fn list_project_cards(factory: &dyn ClientFactory, params: ListProjectCardsParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    let include_archived = params.include_archived.unwrap_or(false);
    let include_content = params.include_content.unwrap_or(true);
    let limit = effective_limit(params.limit);
    let column_filter = non_empty(params.column_id);
    let after = non_empty(params.after);

    let client = acquire(factory)?;
    let doc = build_project_cards_query(include_content);
    let data: NodeData<ItemsNode> = query(
        client.as_ref(),
        &doc,
        json!({ "id": params.board_id, "first": limit, "after": after }),
    )
    .await
    .remote("list", "project cards")?;
    let node = data
        .node
        .filter(|n| !n.id.is_empty())
        .ok_or_else(|| ToolError::NotFound(not_found_message("project", &params.board_id)))?;

    let cards: Vec<Value> = node
        .items
        .nodes
        .iter()
        .filter(|item| include_archived || !item.is_archived)
        .filter(|item| match params.content_type {
            Some(wanted) => item.content.as_ref().map(ItemContent::type_name) == Some(wanted.type_name()),
            None => true,
        })
        .filter(|item| match &column_filter {
            Some(column) => item.status_option_id() == Some(column.as_str()),
            None => true,
        })
        .map(|item| card_summary(item, include_content))
        .collect();

    let mut result = json!({
        "board_id": node.id,
        "board_title": node.title,
        "count": cards.len(),
        "total_count": node.items.total_count,
        "page_info": {
            "end_cursor": node.items.page_info.end_cursor,
            "has_next_page": node.items.page_info.has_next_page,
        },
        "cards": cards,
    });
    if let Some(column) = column_filter {
        result["filtered_by_column"] = json!(column);
    }
    if let Some(content_type) = params.content_type {
        result["filtered_by_type"] = json!(content_type.as_str());
    }
    Ok(result)
}

pub async fn get_project_card(factory: &dyn ClientFactory, params: GetProjectCardParams) -> ToolResult<Value> {
    validate_item_id(&params.card_id)?;

    let client = acquire(factory)?;
    let doc = document(ITEM_QUERY, &project_item_fragments(true));
    let data: NodeData<ProjectItem> = query(client.as_ref(), &doc, json!({ "id": params.card_id }))
        .await
        .remote("get", "card")?;
    let item = data
        .node
        .filter(ProjectItem::is_present)
        .ok_or_else(|| ToolError::NotFound(not_found_message("card", &params.card_id)))?;

    Ok(card_detail(&item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::fragments::tests::assert_closed;

    fn field(value: Value) -> FieldDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_documents_are_closed() {
        assert_closed(&document(ITEM_FIELDS_QUERY, &[FIELD_DEFINITION_FRAGMENT]));
        assert_closed(&document(ITEM_QUERY, &project_item_fragments(true)));
        for doc in [
            ADD_ITEM_MUTATION,
            ITEM_POSITION_MUTATION,
            ARCHIVE_ITEM_MUTATION,
            DELETE_ITEM_MUTATION,
        ] {
            assert_closed(doc);
        }
    }

    #[test]
    fn test_field_update_values() {
        let priority = field(json!({
            "__typename": "ProjectV2SingleSelectField", "id": "PVTSSF_p", "name": "Priority",
            "options": [{"id": "opt-high", "name": "High"}]
        }));
        let notes = field(json!({"__typename": "ProjectV2Field", "id": "PVTF_n", "name": "Notes", "dataType": "TEXT"}));
        let due = field(json!({"__typename": "ProjectV2Field", "id": "PVTF_d", "name": "Due", "dataType": "DATE"}));

        assert_eq!(field_update_value(&priority, &json!("high")), json!({"singleSelectOptionId": "opt-high"}));
        assert_eq!(field_update_value(&priority, &json!("Urgent")), json!({"text": "Urgent"}));
        assert_eq!(field_update_value(&notes, &json!("hello")), json!({"text": "hello"}));
        assert_eq!(field_update_value(&due, &json!("2024-06-01")), json!({"date": "2024-06-01"}));
        assert_eq!(field_update_value(&notes, &json!(3)), json!({"number": 3}));
        assert_eq!(field_update_value(&notes, &json!(true)), json!({"text": "true"}));
        assert_eq!(field_update_value(&notes, &json!(["a"])), json!(["a"]));
    }
}
