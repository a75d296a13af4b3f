//! Project items (cards)

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::common::{Actor, Connection};
use super::content::ItemContent;
use super::field::FieldValue;

/// Name of the single-select field whose options are the board's columns
pub const STATUS_FIELD: &str = "Status";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub id: String,
    /// ISSUE, PULL_REQUEST, DRAFT_ISSUE or REDACTED
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub is_archived: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub creator: Option<Actor>,
    pub content: Option<ItemContent>,
    pub field_values: Connection<FieldValue>,
    pub project: Option<ItemProject>,
}

/// The project an item belongs to
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemProject {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl ProjectItem {
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    /// Option ID of the item's Status value, i.e. its column
    pub fn status_option_id(&self) -> Option<&str> {
        self.field_values.nodes.iter().find_map(|value| match value {
            FieldValue::SingleSelect(v) if v.field.name == STATUS_FIELD => v.option_id.as_deref(),
            _ => None,
        })
    }

    /// Content discriminant, falling back to the item type for redacted content
    pub fn type_name(&self) -> String {
        match (&self.content, &self.item_type) {
            (Some(content), _) => content.type_name().to_string(),
            (None, Some(item_type)) => item_type.clone(),
            (None, None) => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_option_id() {
        let item: ProjectItem = serde_json::from_value(json!({
            "id": "PVTI_1",
            "type": "ISSUE",
            "isArchived": false,
            "content": {"__typename": "Issue"},
            "fieldValues": {"nodes": [
                {"__typename": "ProjectV2ItemFieldSingleSelectValue", "optionId": "opt-pri", "field": {"name": "Priority"}},
                {"__typename": "ProjectV2ItemFieldSingleSelectValue", "optionId": "opt-done", "field": {"name": "Status"}}
            ]}
        }))
        .unwrap();
        assert_eq!(item.status_option_id(), Some("opt-done"));
        assert_eq!(item.type_name(), "Issue");
    }

    #[test]
    fn test_redacted_item() {
        let item: ProjectItem =
            serde_json::from_value(json!({"id": "PVTI_2", "type": "REDACTED", "content": null})).unwrap();
        assert!(item.status_option_id().is_none());
        assert_eq!(item.type_name(), "REDACTED");
    }
}
