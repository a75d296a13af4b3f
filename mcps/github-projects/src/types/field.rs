//! Item field values

use serde::Deserialize;

use super::common::{Actor, Connection, Label, Milestone, RepositoryRef};

/// The field a value belongs to
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRef {
    pub id: String,
    pub name: String,
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextValue {
    pub text: Option<String>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberValue {
    pub number: Option<f64>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DateValue {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleSelectValue {
    pub option_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IterationValue {
    pub iteration_id: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub duration: Option<u32>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepositoryValue {
    pub repository: Option<RepositoryRef>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserValue {
    pub users: Connection<Actor>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelValue {
    pub labels: Connection<Label>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MilestoneValue {
    pub milestone: Option<Milestone>,
    pub field: FieldRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestRef {
    pub id: Option<String>,
    pub number: u32,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestValue {
    pub pull_requests: Connection<PullRequestRef>,
    pub field: FieldRef,
}

/// A value of one field on one item
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum FieldValue {
    #[serde(rename = "ProjectV2ItemFieldTextValue")]
    Text(TextValue),
    #[serde(rename = "ProjectV2ItemFieldNumberValue")]
    Number(NumberValue),
    #[serde(rename = "ProjectV2ItemFieldDateValue")]
    Date(DateValue),
    #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
    SingleSelect(SingleSelectValue),
    #[serde(rename = "ProjectV2ItemFieldIterationValue")]
    Iteration(IterationValue),
    #[serde(rename = "ProjectV2ItemFieldRepositoryValue")]
    Repository(RepositoryValue),
    #[serde(rename = "ProjectV2ItemFieldUserValue")]
    Users(UserValue),
    #[serde(rename = "ProjectV2ItemFieldLabelValue")]
    Labels(LabelValue),
    #[serde(rename = "ProjectV2ItemFieldMilestoneValue")]
    Milestone(MilestoneValue),
    #[serde(rename = "ProjectV2ItemFieldPullRequestValue")]
    PullRequests(PullRequestValue),
    #[serde(other)]
    Unknown,
}

impl FieldValue {
    pub fn field(&self) -> Option<&FieldRef> {
        match self {
            Self::Text(v) => Some(&v.field),
            Self::Number(v) => Some(&v.field),
            Self::Date(v) => Some(&v.field),
            Self::SingleSelect(v) => Some(&v.field),
            Self::Iteration(v) => Some(&v.field),
            Self::Repository(v) => Some(&v.field),
            Self::Users(v) => Some(&v.field),
            Self::Labels(v) => Some(&v.field),
            Self::Milestone(v) => Some(&v.field),
            Self::PullRequests(v) => Some(&v.field),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_variants() {
        let values: Vec<FieldValue> = serde_json::from_value(json!([
            {"__typename": "ProjectV2ItemFieldTextValue", "text": "hello",
             "field": {"id": "PVTF_t", "name": "Notes", "dataType": "TEXT"}},
            {"__typename": "ProjectV2ItemFieldNumberValue", "number": 3.5, "field": {"id": "PVTF_n", "name": "Points"}},
            {"__typename": "ProjectV2ItemFieldSingleSelectValue", "optionId": "47fc9ee4", "name": "In Progress",
             "field": {"id": "PVTSSF_s", "name": "Status"}},
            {"__typename": "ProjectV2ItemFieldLabelValue",
             "labels": {"totalCount": 1, "nodes": [{"name": "bug", "color": "d73a4a"}]}, "field": {"id": "PVTF_l", "name": "Labels"}},
            {"__typename": "ProjectV2ItemFieldReviewerValue", "field": {"id": "x", "name": "Reviewers"}}
        ]))
        .unwrap();

        match &values[0] {
            FieldValue::Text(v) => assert_eq!(v.text.as_deref(), Some("hello")),
            other => panic!("unexpected {other:?}"),
        }
        match &values[1] {
            FieldValue::Number(v) => assert_eq!(v.number, Some(3.5)),
            other => panic!("unexpected {other:?}"),
        }
        match &values[2] {
            FieldValue::SingleSelect(v) => {
                assert_eq!(v.option_id.as_deref(), Some("47fc9ee4"));
                assert_eq!(v.field.name, "Status");
            }
            other => panic!("unexpected {other:?}"),
        }
        match &values[3] {
            FieldValue::Labels(v) => assert_eq!(v.labels.nodes[0].name, "bug"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(values[4], FieldValue::Unknown));
        assert!(values[4].field().is_none());
    }

    #[test]
    fn test_value_without_field_selection() {
        let value: FieldValue =
            serde_json::from_value(json!({"__typename": "ProjectV2ItemFieldSingleSelectValue", "optionId": "abc"}))
                .unwrap();
        assert_eq!(value.field().map(|f| f.name.as_str()), Some(""));
    }
}
