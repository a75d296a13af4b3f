//! Column handlers
//!
//! A column is an option of the board's single-select "Status" field.
//! GitHub exposes no API to add, edit, remove or reorder those options, so
//! the four mutating tools only validate their input, describe the change
//! that would be made and report it as unsupported.

use serde_json::{json, Map, Value};
use std::collections::HashSet;

use super::lookup::{fetch_status_field, load_board_columns, resolve_column};
use super::{acquire, ToolError, ToolResult};
use crate::github::ClientFactory;
use crate::graphql::errors::not_found_message;
use crate::graphql::ids::{validate_column_id, validate_project_id};
use crate::params::{
    non_empty, CreateProjectColumnParams, DeleteProjectColumnParams, GetProjectColumnParams, ListProjectColumnsParams,
    ReorderProjectColumnsParams, UpdateProjectColumnParams,
};

fn unsupported(operation: &str, proposed_change: Value) -> ToolError {
    ToolError::Unsupported(json!({
        "supported": false,
        "operation": operation,
        "proposed_change": proposed_change,
        "message": format!(
            "{operation} is not supported: GitHub Projects has no API for changing the options of the Status field. \
             Apply the proposed change in the project settings on github.com."
        ),
    }))
}

pub async fn list_project_columns(factory: &dyn ClientFactory, params: ListProjectColumnsParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;

    let client = acquire(factory)?;
    let listing = load_board_columns(client.as_ref(), &params.board_id).await?;

    Ok(json!({
        "board_id": listing.board.id,
        "board_title": listing.board.title,
        "field_id": listing.board.field.id,
        "field_name": listing.board.field.name,
        "total_count": listing.columns.len(),
        "total_items": listing.total_items,
        "columns": listing.columns,
    }))
}

pub async fn get_project_column(factory: &dyn ClientFactory, params: GetProjectColumnParams) -> ToolResult<Value> {
    validate_column_id(&params.column_id)?;

    let client = acquire(factory)?;
    let client = client.as_ref();
    let target = resolve_column(client, &params.column_id).await?;
    let listing = load_board_columns(client, &target.project_id).await?;

    let mut column = listing
        .columns
        .into_iter()
        .find(|c| c["id"] == target.option_id.as_str())
        .ok_or_else(|| ToolError::NotFound(not_found_message("column", &params.column_id)))?;

    column["field_id"] = json!(listing.board.field.id);
    column["board_id"] = json!(listing.board.id);
    column["board_title"] = json!(listing.board.title);
    Ok(column)
}

pub async fn create_project_column(factory: &dyn ClientFactory, params: CreateProjectColumnParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    let name = non_empty(Some(params.name)).ok_or_else(|| ToolError::invalid("name must not be empty"))?;

    let client = acquire(factory)?;
    let board = fetch_status_field(client.as_ref(), &params.board_id).await?;
    if board.field.option(&name).is_some() {
        return Err(ToolError::invalid(format!("column '{name}' already exists on this board")));
    }

    let mut new_column = Map::new();
    new_column.insert("name".into(), json!(name));
    if let Some(description) = non_empty(params.description) {
        new_column.insert("description".into(), json!(description));
    }
    if let Some(color) = non_empty(params.color) {
        new_column.insert("color".into(), json!(color.to_uppercase()));
    }
    if let Some(limit) = params.limit {
        new_column.insert("wip_limit".into(), json!(limit));
    }

    let mut resulting: Vec<Value> = board.field.options.iter().map(|o| json!(o.name)).collect();
    resulting.push(json!(name));

    Err(unsupported(
        "create_project_column",
        json!({
            "board_id": board.id,
            "field_id": board.field.id,
            "add_column": new_column,
            "resulting_columns": resulting,
        }),
    ))
}

pub async fn update_project_column(_factory: &dyn ClientFactory, params: UpdateProjectColumnParams) -> ToolResult<Value> {
    validate_column_id(&params.column_id)?;

    let mut changes = Map::new();
    if let Some(name) = non_empty(params.name) {
        changes.insert("name".into(), json!(name));
    }
    if let Some(description) = non_empty(params.description) {
        changes.insert("description".into(), json!(description));
    }
    if let Some(color) = non_empty(params.color) {
        changes.insert("color".into(), json!(color.to_uppercase()));
    }
    if let Some(limit) = params.limit {
        changes.insert("wip_limit".into(), json!(limit));
    }
    if changes.is_empty() {
        return Err(ToolError::invalid(
            "no fields to update - provide at least one of name, description, color, limit",
        ));
    }

    Err(unsupported(
        "update_project_column",
        json!({ "column_id": params.column_id, "changes": changes }),
    ))
}

pub async fn delete_project_column(_factory: &dyn ClientFactory, params: DeleteProjectColumnParams) -> ToolResult<Value> {
    validate_column_id(&params.column_id)?;
    let archive_cards = params.archive_cards.unwrap_or(true);

    Err(unsupported(
        "delete_project_column",
        json!({
            "column_id": params.column_id,
            "cards": if archive_cards { "archive" } else { "clear_status" },
        }),
    ))
}

pub async fn reorder_project_columns(
    factory: &dyn ClientFactory,
    params: ReorderProjectColumnsParams,
) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    if params.column_order.is_empty() {
        return Err(ToolError::invalid("column_order must contain at least one column ID"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = params.column_order.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(ToolError::invalid(format!("column '{dup}' appears more than once in column_order")));
    }

    let client = acquire(factory)?;
    let board = fetch_status_field(client.as_ref(), &params.board_id).await?;

    let known: HashSet<&str> = board.field.options.iter().map(|o| o.id.as_str()).collect();
    let unknown: Vec<&String> = params.column_order.iter().filter(|id| !known.contains(id.as_str())).collect();
    if !unknown.is_empty() {
        return Err(ToolError::invalid(format!(
            "unknown column IDs for this board: {}",
            unknown.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        )));
    }

    // Columns left out keep their relative order after the listed ones
    let listed: HashSet<&str> = params.column_order.iter().map(String::as_str).collect();
    let resulting: Vec<Value> = params
        .column_order
        .iter()
        .filter_map(|id| board.field.options.iter().find(|o| &o.id == id))
        .chain(board.field.options.iter().filter(|o| !listed.contains(o.id.as_str())))
        .enumerate()
        .map(|(position, o)| json!({ "id": o.id, "name": o.name, "position": position }))
        .collect();

    Err(unsupported(
        "reorder_project_columns",
        json!({
            "board_id": board.id,
            "field_id": board.field.id,
            "resulting_order": resulting,
        }),
    ))
}
