//! Flattening of typed responses into tool output
//!
//! Output maps use snake_case keys. Absent timestamps are left out rather
//! than rendered as sentinels, and the `Unknown` arm of every polymorphic
//! node contributes nothing beyond, at most, its discriminant.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::types::common::{Actor, Label, Milestone, RepositoryRef};
use crate::types::project::{IterationConfiguration, SingleSelectOption};
use crate::types::{FieldDefinition, FieldValue, ItemContent, Project, ProjectItem};

/// `%Y-%m-%dT%H:%M:%SZ`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn put_timestamp(map: &mut Map<String, Value>, key: &str, ts: Option<&DateTime<Utc>>) {
    if let Some(ts) = ts {
        map.insert(key.to_string(), Value::String(format_timestamp(ts)));
    }
}

fn put_opt<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

// ============================================================================
// Shared leaves
// ============================================================================

pub fn actor(actor: &Actor) -> Value {
    let mut map = Map::new();
    put_opt(&mut map, "id", actor.id.clone());
    map.insert("login".into(), json!(actor.login));
    put_opt(&mut map, "avatar_url", actor.avatar_url.clone());
    Value::Object(map)
}

pub fn label(label: &Label) -> Value {
    let mut map = Map::new();
    put_opt(&mut map, "id", label.id.clone());
    map.insert("name".into(), json!(label.name));
    put_opt(&mut map, "color", label.color.clone());
    put_opt(&mut map, "description", label.description.clone());
    Value::Object(map)
}

pub fn milestone(milestone: &Milestone) -> Value {
    let mut map = Map::new();
    put_opt(&mut map, "id", milestone.id.clone());
    map.insert("title".into(), json!(milestone.title));
    put_opt(&mut map, "state", milestone.state.clone());
    put_timestamp(&mut map, "due_on", milestone.due_on.as_ref());
    Value::Object(map)
}

pub fn repository(repo: &RepositoryRef) -> Value {
    let mut map = Map::new();
    put_opt(&mut map, "id", repo.id.clone());
    map.insert("name".into(), json!(repo.name));
    put_opt(&mut map, "name_with_owner", repo.name_with_owner.clone());
    put_opt(&mut map, "url", repo.url.clone());
    Value::Object(map)
}

// ============================================================================
// Boards and fields
// ============================================================================

/// Board metadata as listed by `list_project_boards`
pub fn project_summary(project: &Project) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), json!(project.id));
    map.insert("number".into(), json!(project.number));
    map.insert("title".into(), json!(project.title));
    map.insert("description".into(), json!(project.readme.clone().unwrap_or_default()));
    map.insert(
        "short_description".into(),
        json!(project.short_description.clone().unwrap_or_default()),
    );
    map.insert("public".into(), json!(project.public));
    map.insert("closed".into(), json!(project.closed));
    map.insert("url".into(), json!(project.url));
    map.insert("items_count".into(), json!(project.items.map(|c| c.total_count).unwrap_or(0)));
    put_timestamp(&mut map, "created_at", project.created_at.as_ref());
    put_timestamp(&mut map, "updated_at", project.updated_at.as_ref());
    Value::Object(map)
}

fn select_option(option: &SingleSelectOption) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), json!(option.id));
    map.insert("name".into(), json!(option.name));
    put_opt(&mut map, "color", option.color.clone());
    put_opt(&mut map, "description", option.description.clone());
    Value::Object(map)
}

fn iteration_configuration(config: &IterationConfiguration) -> Value {
    let iterations: Vec<Value> = config
        .iterations
        .iter()
        .map(|it| {
            json!({
                "id": it.id,
                "title": it.title,
                "start_date": it.start_date,
                "duration": it.duration,
            })
        })
        .collect();
    json!({
        "duration": config.duration,
        "start_day": config.start_day,
        "iterations": iterations,
    })
}

/// A field definition with its options or iteration configuration
pub fn field_definition(def: &FieldDefinition) -> Option<Value> {
    let mut map = Map::new();
    match def {
        FieldDefinition::Field(f) => {
            map.insert("id".into(), json!(f.id));
            map.insert("name".into(), json!(f.name));
            put_opt(&mut map, "data_type", f.data_type.clone());
        }
        FieldDefinition::SingleSelect(f) => {
            map.insert("id".into(), json!(f.id));
            map.insert("name".into(), json!(f.name));
            put_opt(&mut map, "data_type", f.data_type.clone());
            let options: Vec<Value> = f.options.iter().map(select_option).collect();
            map.insert("options".into(), Value::Array(options));
        }
        FieldDefinition::Iteration(f) => {
            map.insert("id".into(), json!(f.id));
            map.insert("name".into(), json!(f.name));
            put_opt(&mut map, "data_type", f.data_type.clone());
            if let Some(config) = &f.configuration {
                map.insert("configuration".into(), iteration_configuration(config));
            }
        }
        FieldDefinition::Unknown => return None,
    }
    map.insert("type".into(), json!(def.type_name()));
    Some(Value::Object(map))
}

// ============================================================================
// Field values
// ============================================================================

/// The value part of a field value; `None` for empty or unknown values
pub fn field_value(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::Text(v) => v.text.clone().map(Value::String),
        FieldValue::Number(v) => v.number.map(|n| json!(n)),
        FieldValue::Date(v) => v.date.clone().map(Value::String),
        FieldValue::SingleSelect(v) => {
            let mut map = Map::new();
            put_opt(&mut map, "id", v.option_id.clone());
            put_opt(&mut map, "name", v.name.clone());
            put_opt(&mut map, "description", v.description.clone());
            put_opt(&mut map, "color", v.color.clone());
            Some(Value::Object(map))
        }
        FieldValue::Iteration(v) => {
            let mut map = Map::new();
            put_opt(&mut map, "id", v.iteration_id.clone());
            put_opt(&mut map, "title", v.title.clone());
            put_opt(&mut map, "start_date", v.start_date.clone());
            put_opt(&mut map, "duration", v.duration);
            Some(Value::Object(map))
        }
        FieldValue::Repository(v) => v.repository.as_ref().map(repository),
        FieldValue::Users(v) => Some(Value::Array(v.users.nodes.iter().map(actor).collect())),
        FieldValue::Labels(v) => Some(Value::Array(v.labels.nodes.iter().map(label).collect())),
        FieldValue::Milestone(v) => v.milestone.as_ref().map(milestone),
        FieldValue::PullRequests(v) => Some(Value::Array(
            v.pull_requests
                .nodes
                .iter()
                .map(|pr| {
                    let mut map = Map::new();
                    put_opt(&mut map, "id", pr.id.clone());
                    map.insert("number".into(), json!(pr.number));
                    map.insert("title".into(), json!(pr.title));
                    put_opt(&mut map, "url", pr.url.clone());
                    Value::Object(map)
                })
                .collect(),
        )),
        FieldValue::Unknown => None,
    }
}

/// Field values keyed by field name
pub fn field_values<'a>(values: impl IntoIterator<Item = &'a FieldValue>) -> Map<String, Value> {
    let mut map = Map::new();
    for value in values {
        let (Some(field), Some(rendered)) = (value.field(), field_value(value)) else {
            continue;
        };
        if field.name.is_empty() {
            continue;
        }
        map.insert(field.name.clone(), rendered);
    }
    map
}

/// Field values keyed by field name, each with its field metadata
pub fn field_values_detailed<'a>(values: impl IntoIterator<Item = &'a FieldValue>) -> Map<String, Value> {
    let mut map = Map::new();
    for value in values {
        let (Some(field), Some(rendered)) = (value.field(), field_value(value)) else {
            continue;
        };
        if field.name.is_empty() {
            continue;
        }
        let mut entry = Map::new();
        entry.insert("field_id".into(), json!(field.id));
        entry.insert("field_name".into(), json!(field.name));
        put_opt(&mut entry, "data_type", field.data_type.clone());
        entry.insert("value".into(), rendered);
        map.insert(field.name.clone(), Value::Object(entry));
    }
    map
}

// ============================================================================
// Content
// ============================================================================

/// Level of detail for item content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Summary,
    Full,
}

fn common_issue_fields(
    map: &mut Map<String, Value>,
    author: Option<&Actor>,
    assignees: &[Actor],
    labels: &[Label],
    detail: Detail,
) {
    match detail {
        Detail::Summary => {
            let labels: Vec<Value> = labels
                .iter()
                .map(|l| json!({"name": l.name, "color": l.color}))
                .collect();
            let assignees: Vec<Value> = assignees
                .iter()
                .map(|a| json!({"login": a.login, "avatar_url": a.avatar_url}))
                .collect();
            map.insert("labels".into(), Value::Array(labels));
            map.insert("assignees".into(), Value::Array(assignees));
        }
        Detail::Full => {
            map.insert("labels".into(), Value::Array(labels.iter().map(label).collect()));
            map.insert("assignees".into(), Value::Array(assignees.iter().map(actor).collect()));
            if let Some(author) = author {
                map.insert("author".into(), json!({"login": author.login, "avatar_url": author.avatar_url}));
            }
        }
    }
}

/// Issue, pull request or draft issue content
pub fn content(content: &ItemContent, detail: Detail) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), json!(content.type_name()));
    match content {
        ItemContent::Issue(issue) => {
            map.insert("id".into(), json!(issue.id));
            map.insert("number".into(), json!(issue.number));
            map.insert("title".into(), json!(issue.title));
            put_opt(&mut map, "state", issue.state.clone());
            put_opt(&mut map, "url", issue.url.clone());
            common_issue_fields(
                &mut map,
                issue.author.as_ref(),
                &issue.assignees.nodes,
                &issue.labels.nodes,
                detail,
            );
            if detail == Detail::Full {
                map.insert("body".into(), json!(issue.body.clone().unwrap_or_default()));
                put_opt(&mut map, "state_reason", issue.state_reason.clone());
                put_timestamp(&mut map, "created_at", issue.created_at.as_ref());
                put_timestamp(&mut map, "updated_at", issue.updated_at.as_ref());
                put_timestamp(&mut map, "closed_at", issue.closed_at.as_ref());
                map.insert("comment_count".into(), json!(issue.comments.total_count));
                map.insert("reaction_count".into(), json!(issue.reactions.total_count));
                if let Some(m) = &issue.milestone {
                    map.insert("milestone".into(), milestone(m));
                }
                if let Some(repo) = &issue.repository {
                    map.insert("repository".into(), repository(repo));
                }
            }
        }
        ItemContent::PullRequest(pr) => {
            map.insert("id".into(), json!(pr.id));
            map.insert("number".into(), json!(pr.number));
            map.insert("title".into(), json!(pr.title));
            put_opt(&mut map, "state", pr.state.clone());
            put_opt(&mut map, "url", pr.url.clone());
            map.insert("is_draft".into(), json!(pr.is_draft));
            put_opt(&mut map, "review_decision", pr.review_decision.clone());
            common_issue_fields(&mut map, pr.author.as_ref(), &pr.assignees.nodes, &pr.labels.nodes, detail);
            if detail == Detail::Full {
                map.insert("body".into(), json!(pr.body.clone().unwrap_or_default()));
                put_timestamp(&mut map, "created_at", pr.created_at.as_ref());
                put_timestamp(&mut map, "updated_at", pr.updated_at.as_ref());
                put_timestamp(&mut map, "closed_at", pr.closed_at.as_ref());
                put_timestamp(&mut map, "merged_at", pr.merged_at.as_ref());
                put_opt(&mut map, "mergeable", pr.mergeable.clone());
                put_opt(&mut map, "head_ref", pr.head_ref_name.clone());
                put_opt(&mut map, "base_ref", pr.base_ref_name.clone());
                map.insert("additions".into(), json!(pr.additions));
                map.insert("deletions".into(), json!(pr.deletions));
                map.insert("changed_files".into(), json!(pr.changed_files));
                map.insert("comment_count".into(), json!(pr.comments.total_count));
                map.insert("review_count".into(), json!(pr.reviews.total_count));
                if let Some(m) = &pr.milestone {
                    map.insert("milestone".into(), milestone(m));
                }
                if let Some(repo) = &pr.repository {
                    map.insert("repository".into(), repository(repo));
                }
            }
        }
        ItemContent::DraftIssue(draft) => {
            map.insert("id".into(), json!(draft.id));
            map.insert("title".into(), json!(draft.title));
            if detail == Detail::Full {
                map.insert("body".into(), json!(draft.body.clone().unwrap_or_default()));
                put_timestamp(&mut map, "created_at", draft.created_at.as_ref());
                put_timestamp(&mut map, "updated_at", draft.updated_at.as_ref());
                if let Some(creator) = &draft.creator {
                    map.insert("creator".into(), json!({"login": creator.login, "avatar_url": creator.avatar_url}));
                }
            }
        }
        ItemContent::Unknown => {}
    }
    Value::Object(map)
}

// ============================================================================
// Items
// ============================================================================

/// A card as listed by `list_project_cards`
pub fn card_summary(item: &ProjectItem, include_content: bool) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), json!(item.id));
    map.insert("type".into(), json!(item.type_name()));
    map.insert("archived".into(), json!(item.is_archived));
    put_timestamp(&mut map, "created_at", item.created_at.as_ref());
    put_timestamp(&mut map, "updated_at", item.updated_at.as_ref());
    put_opt(&mut map, "column_id", item.status_option_id().map(str::to_string));
    map.insert(
        "fields".into(),
        Value::Object(field_values(&item.field_values.nodes)),
    );
    if include_content {
        if let Some(c) = &item.content {
            map.insert("content".into(), content(c, Detail::Summary));
        }
    }
    Value::Object(map)
}

/// A card with every field value and full content
pub fn card_detail(item: &ProjectItem) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), json!(item.id));
    map.insert("type".into(), json!(item.type_name()));
    map.insert("archived".into(), json!(item.is_archived));
    put_timestamp(&mut map, "created_at", item.created_at.as_ref());
    put_timestamp(&mut map, "updated_at", item.updated_at.as_ref());
    if let Some(creator) = &item.creator {
        map.insert("creator".into(), json!({"login": creator.login, "avatar_url": creator.avatar_url}));
    }
    if let Some(project) = &item.project {
        let mut p = Map::new();
        p.insert("id".into(), json!(project.id));
        put_opt(&mut p, "title", project.title.clone());
        put_opt(&mut p, "url", project.url.clone());
        map.insert("project".into(), Value::Object(p));
    }
    map.insert(
        "fields".into(),
        Value::Object(field_values_detailed(&item.field_values.nodes)),
    );
    if let Some(c) = &item.content {
        map.insert("content".into(), content(c, Detail::Full));
    }
    Value::Object(map)
}
