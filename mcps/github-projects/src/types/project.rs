//! Project boards, their owners and their field definitions

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::common::{Connection, Count};

/// A ProjectV2 node
///
/// Every selection is optional so the same type serves the summary, detail
/// and mutation payload shapes. A node of another type selected through
/// `... on ProjectV2` decodes with an empty `id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub short_description: Option<String>,
    /// Board description; GitHub calls it the readme
    pub readme: Option<String>,
    pub public: bool,
    pub closed: bool,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<ProjectOwner>,
    pub items: Option<Count>,
    pub fields: Option<Connection<FieldDefinition>>,
}

impl Project {
    /// Whether the node actually resolved to a project
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwnerLogin {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum ProjectOwner {
    User(OwnerLogin),
    Organization(OwnerLogin),
    #[serde(other)]
    Unknown,
}

impl ProjectOwner {
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::User(owner) | Self::Organization(owner) => Some(owner.login.as_str()),
            Self::Unknown => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Organization(_) => "organization",
            Self::Unknown => "unknown",
        }
    }
}

/// Common part of every field configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlainField {
    pub id: String,
    pub name: String,
    /// TEXT, NUMBER, DATE, SINGLE_SELECT, ITERATION, ...
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleSelectField {
    pub id: String,
    pub name: String,
    pub data_type: Option<String>,
    pub options: Vec<SingleSelectOption>,
}

impl SingleSelectField {
    /// Option matching a name (case-insensitive) or an option ID
    pub fn option(&self, name_or_id: &str) -> Option<&SingleSelectOption> {
        self.options
            .iter()
            .find(|option| option.id == name_or_id || option.name.eq_ignore_ascii_case(name_or_id))
    }
}

/// One column of a board when the field is "Status"
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SingleSelectOption {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IterationField {
    pub id: String,
    pub name: String,
    pub data_type: Option<String>,
    pub configuration: Option<IterationConfiguration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IterationConfiguration {
    pub duration: u32,
    pub start_day: u32,
    pub iterations: Vec<Iteration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Iteration {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub duration: u32,
}

/// A field configuration of a project
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum FieldDefinition {
    #[serde(rename = "ProjectV2Field")]
    Field(PlainField),
    #[serde(rename = "ProjectV2SingleSelectField")]
    SingleSelect(SingleSelectField),
    #[serde(rename = "ProjectV2IterationField")]
    Iteration(IterationField),
    #[serde(other)]
    Unknown,
}

impl FieldDefinition {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Field(f) => Some(&f.id),
            Self::SingleSelect(f) => Some(&f.id),
            Self::Iteration(f) => Some(&f.id),
            Self::Unknown => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Field(f) => Some(&f.name),
            Self::SingleSelect(f) => Some(&f.name),
            Self::Iteration(f) => Some(&f.name),
            Self::Unknown => None,
        }
    }

    pub fn data_type(&self) -> Option<&str> {
        match self {
            Self::Field(f) => f.data_type.as_deref(),
            Self::SingleSelect(f) => f.data_type.as_deref(),
            Self::Iteration(f) => f.data_type.as_deref(),
            Self::Unknown => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Field(_) => "ProjectV2Field",
            Self::SingleSelect(_) => "ProjectV2SingleSelectField",
            Self::Iteration(_) => "ProjectV2IterationField",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_variants() {
        let owner: ProjectOwner = serde_json::from_value(json!({"__typename": "Organization", "login": "acme"})).unwrap();
        assert_eq!(owner.login(), Some("acme"));
        assert_eq!(owner.kind(), "organization");

        let owner: ProjectOwner = serde_json::from_value(json!({"__typename": "Enterprise", "login": "big"})).unwrap();
        assert!(matches!(owner, ProjectOwner::Unknown));
        assert_eq!(owner.login(), None);
    }

    #[test]
    fn test_field_definitions() {
        let fields: Vec<FieldDefinition> = serde_json::from_value(json!([
            {"__typename": "ProjectV2Field", "id": "PVTF_1", "name": "Title", "dataType": "TITLE"},
            {"__typename": "ProjectV2SingleSelectField", "id": "PVTSSF_1", "name": "Status", "dataType": "SINGLE_SELECT",
             "options": [{"id": "f75ad846", "name": "Todo", "color": "GRAY"}, {"id": "47fc9ee4", "name": "In Progress"}]},
            {"__typename": "ProjectV2IterationField", "id": "PVTIF_1", "name": "Sprint",
             "configuration": {"duration": 14, "startDay": 1, "iterations": [{"id": "it1", "title": "Sprint 1", "startDate": "2024-01-01", "duration": 14}]}},
            {"__typename": "ProjectV2SomethingNew", "id": "X"}
        ]))
        .unwrap();

        assert_eq!(fields[0].name(), Some("Title"));
        assert_eq!(fields[0].data_type(), Some("TITLE"));
        match &fields[1] {
            FieldDefinition::SingleSelect(status) => {
                assert_eq!(status.option("in progress").map(|o| o.id.as_str()), Some("47fc9ee4"));
                assert_eq!(status.option("f75ad846").map(|o| o.name.as_str()), Some("Todo"));
                assert!(status.option("Done").is_none());
            }
            other => panic!("expected single select, got {other:?}"),
        }
        match &fields[2] {
            FieldDefinition::Iteration(sprint) => {
                let config = sprint.configuration.as_ref().unwrap();
                assert_eq!(config.duration, 14);
                assert_eq!(config.iterations[0].title, "Sprint 1");
            }
            other => panic!("expected iteration, got {other:?}"),
        }
        assert!(matches!(fields[3], FieldDefinition::Unknown));
        assert_eq!(fields[3].id(), None);
    }

    #[test]
    fn test_non_project_node_is_absent() {
        let project: Project = serde_json::from_value(json!({})).unwrap();
        assert!(!project.is_present());
    }
}
