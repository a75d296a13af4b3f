//! Project board handlers

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::lookup::{resolve_owner_id, resolve_repository_id, NodeData};
use super::{acquire, tolerate_not_found, RemoteContext, ToolError, ToolResult};
use crate::github::{mutate, query, query_partial, ClientFactory, GitHubError};
use crate::graphql::errors::{format_graphql_error, not_found_message};
use crate::graphql::fragments::{document, FIELD_DEFINITION_FRAGMENT, PROJECT_SUMMARY_FRAGMENT};
use crate::graphql::ids::validate_project_id;
use crate::normalize::{field_definition, format_timestamp, project_summary};
use crate::params::{
    effective_limit, non_empty, CreateProjectBoardParams, DeleteProjectBoardParams, GetProjectBoardParams,
    ListProjectBoardsParams, UpdateProjectBoardParams,
};
use crate::types::{Connection, Project};

const CREATE_PROJECT_MUTATION: &str = r#"
mutation CreateProject($input: CreateProjectV2Input!) {
  createProjectV2(input: $input) {
    projectV2 { id number title readme public url }
  }
}
"#;

const UPDATE_PROJECT_MUTATION: &str = r#"
mutation UpdateProject($input: UpdateProjectV2Input!) {
  updateProjectV2(input: $input) {
    projectV2 { id title readme shortDescription public closed url updatedAt }
  }
}
"#;

const DELETE_PROJECT_MUTATION: &str = r#"
mutation DeleteProject($input: DeleteProjectV2Input!) {
  deleteProjectV2(input: $input) {
    projectV2 { id }
  }
}
"#;

const OWNER_PROJECTS_QUERY: &str = r#"
query OwnerProjects($login: String!, $first: Int!) {
  user(login: $login) {
    projectsV2(first: $first) {
      totalCount
      nodes { ...ProjectSummaryFragment }
    }
  }
  organization(login: $login) {
    projectsV2(first: $first) {
      totalCount
      nodes { ...ProjectSummaryFragment }
    }
  }
}
"#;

const PROJECT_QUERY: &str = r#"
query Project($id: ID!) {
  node(id: $id) {
    ... on ProjectV2 {
      ...ProjectSummaryFragment
      owner {
        __typename
        ... on User { login }
        ... on Organization { login }
      }
      fields(first: 50) {
        totalCount
        nodes { ...FieldDefinitionFragment }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectData {
    create_project_v2: ProjectPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProjectData {
    update_project_v2: ProjectPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteProjectData {
    delete_project_v2: ProjectPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectPayload {
    project_v2: Option<Project>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OwnerProjects {
    projects_v2: Connection<Project>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwnerProjectsData {
    user: Option<OwnerProjects>,
    organization: Option<OwnerProjects>,
}

fn mutation_payload(payload: ProjectPayload) -> ToolResult<Project> {
    payload
        .project_v2
        .filter(Project::is_present)
        .ok_or_else(|| ToolError::Remote {
            action: "read",
            resource: "mutation result",
            source: GitHubError::MissingData,
        })
}

// ============================================================================
// create / update / delete
// ============================================================================

pub async fn create_project_board(factory: &dyn ClientFactory, params: CreateProjectBoardParams) -> ToolResult<Value> {
    let name = non_empty(Some(params.name)).ok_or_else(|| ToolError::invalid("name must not be empty"))?;
    let owner = non_empty(Some(params.owner)).ok_or_else(|| ToolError::invalid("owner must not be empty"))?;

    let client = acquire(factory)?;
    let client = client.as_ref();

    let owner_id = resolve_owner_id(client, &owner).await?;

    let mut input = json!({ "ownerId": owner_id, "title": name });
    if let Some(repo) = non_empty(params.repository) {
        input["repositoryId"] = json!(resolve_repository_id(client, &owner, &repo).await?);
    }

    let created: CreateProjectData = mutate(client, CREATE_PROJECT_MUTATION, json!({ "input": input }))
        .await
        .remote("create", "project board")?;
    let mut project = mutation_payload(created.create_project_v2)?;

    // Visibility and readme cannot be set on creation
    let description = non_empty(params.description);
    let make_public = params.public == Some(true);
    let mut settings_warning = None;
    if make_public || description.is_some() {
        let mut settings = json!({ "projectId": project.id });
        if make_public {
            settings["public"] = json!(true);
        }
        if let Some(description) = &description {
            settings["readme"] = json!(description);
        }

        match mutate::<UpdateProjectData>(client, UPDATE_PROJECT_MUTATION, json!({ "input": settings })).await {
            Ok(updated) => {
                if let Some(updated) = updated.update_project_v2.project_v2 {
                    project.public = updated.public;
                    project.readme = updated.readme;
                }
            }
            Err(err) => {
                warn!(project_id = %project.id, error = %err, "project created but settings update failed");
                settings_warning = Some(format!(
                    "project created, but setting visibility/description failed: {}",
                    format_graphql_error(&err)
                ));
            }
        }
    }

    let mut result = json!({
        "id": project.id,
        "number": project.number,
        "title": project.title,
        "url": project.url,
        "description": project.readme.unwrap_or_default(),
        "public": project.public,
        "template": params.template.map(|t| t.as_str()).unwrap_or("none"),
    });
    if let Some(warning) = settings_warning {
        result["settings_warning"] = json!(warning);
    }
    Ok(result)
}

pub async fn update_project_board(factory: &dyn ClientFactory, params: UpdateProjectBoardParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;

    let mut input = Map::new();
    if let Some(title) = non_empty(params.title) {
        input.insert("title".into(), json!(title));
    }
    if let Some(description) = non_empty(params.description) {
        input.insert("readme".into(), json!(description));
    }
    if let Some(short) = non_empty(params.short_description) {
        input.insert("shortDescription".into(), json!(short));
    }
    if let Some(public) = params.public {
        input.insert("public".into(), json!(public));
    }
    if let Some(closed) = params.closed {
        input.insert("closed".into(), json!(closed));
    }
    if input.is_empty() {
        return Err(ToolError::invalid(
            "no fields to update - provide at least one of title, description, short_description, public, closed",
        ));
    }
    input.insert("projectId".into(), json!(params.board_id));

    let client = acquire(factory)?;
    let updated: UpdateProjectData = mutate(client.as_ref(), UPDATE_PROJECT_MUTATION, json!({ "input": input }))
        .await
        .remote("update", "project board")?;
    let project = mutation_payload(updated.update_project_v2)?;

    let mut result = json!({
        "id": project.id,
        "title": project.title,
        "description": project.readme.unwrap_or_default(),
        "short_description": project.short_description.unwrap_or_default(),
        "public": project.public,
        "closed": project.closed,
        "url": project.url,
    });
    if let Some(updated_at) = &project.updated_at {
        result["updated_at"] = json!(format_timestamp(updated_at));
    }
    Ok(result)
}

pub async fn delete_project_board(factory: &dyn ClientFactory, params: DeleteProjectBoardParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    if !params.confirm {
        return Err(ToolError::invalid("deletion not confirmed - set confirm to true to delete"));
    }

    let client = acquire(factory)?;
    let deleted: DeleteProjectData = mutate(
        client.as_ref(),
        DELETE_PROJECT_MUTATION,
        json!({ "input": { "projectId": params.board_id } }),
    )
    .await
    .remote("delete", "project board")?;

    let id = deleted
        .delete_project_v2
        .project_v2
        .map(|p| p.id)
        .filter(|id| !id.is_empty())
        .unwrap_or(params.board_id);
    Ok(json!({ "deleted": true, "id": id }))
}

// ============================================================================
// list / get
// ============================================================================

pub async fn list_project_boards(factory: &dyn ClientFactory, params: ListProjectBoardsParams) -> ToolResult<Value> {
    let owner = non_empty(Some(params.owner)).ok_or_else(|| ToolError::invalid("owner must not be empty"))?;
    let owner_type = params.owner_type.unwrap_or_default();
    let include_closed = params.include_closed.unwrap_or(false);
    let limit = effective_limit(params.limit);

    let client = acquire(factory)?;
    let doc = document(OWNER_PROJECTS_QUERY, &[PROJECT_SUMMARY_FRAGMENT]);
    let (data, errors) = query_partial::<OwnerProjectsData>(client.as_ref(), &doc, json!({ "login": owner, "first": limit }))
        .await
        .remote("list", "project boards")?;
    let data = data.unwrap_or_default();

    // One of the two namespaces is expected not to exist
    let ignored = tolerate_not_found(errors, "list", "project boards")?;
    if data.user.is_none() && data.organization.is_none() {
        return Err(ToolError::NotFound(format!("owner '{owner}' not found as a user or organization")));
    }
    debug!(owner = %owner, ignored, "listed project boards");

    let mut projects = Vec::new();
    let namespaces = [
        ("user", owner_type.includes_user(), data.user),
        ("organization", owner_type.includes_organization(), data.organization),
    ];
    for (kind, wanted, namespace) in namespaces {
        let Some(namespace) = namespace.filter(|_| wanted) else {
            continue;
        };
        for project in namespace.projects_v2.nodes.iter().filter(|p| include_closed || !p.closed) {
            let mut entry = project_summary(project);
            entry["owner_type"] = json!(kind);
            projects.push(entry);
        }
    }

    Ok(json!({
        "total_count": projects.len(),
        "projects": projects,
    }))
}

pub async fn get_project_board(factory: &dyn ClientFactory, params: GetProjectBoardParams) -> ToolResult<Value> {
    validate_project_id(&params.board_id)?;
    let include_fields = params.include_fields.unwrap_or(true);
    let include_stats = params.include_stats.unwrap_or(true);

    let client = acquire(factory)?;
    let doc = document(PROJECT_QUERY, &[PROJECT_SUMMARY_FRAGMENT, FIELD_DEFINITION_FRAGMENT]);
    let data: NodeData<Project> = query(client.as_ref(), &doc, json!({ "id": params.board_id }))
        .await
        .remote("get", "project board")?;
    let project = data
        .node
        .filter(Project::is_present)
        .ok_or_else(|| ToolError::NotFound(not_found_message("project", &params.board_id)))?;

    let mut result = project_summary(&project);
    if let Some(owner) = &project.owner {
        result["owner"] = json!({
            "login": owner.login().unwrap_or_default(),
            "type": owner.kind(),
        });
    }
    if include_stats {
        result["statistics"] = json!({
            "total_items": project.items.map(|c| c.total_count).unwrap_or(0),
        });
    }
    if include_fields {
        // fields_count is GitHub's total; unknown field kinds are not rendered
        let (fields, total): (Vec<Value>, u32) = project
            .fields
            .as_ref()
            .map(|conn| (conn.nodes.iter().filter_map(field_definition).collect(), conn.total_count))
            .unwrap_or_default();
        result["fields_count"] = json!(total);
        result["fields"] = Value::Array(fields);
    }
    Ok(result)
}
