//! Reusable GraphQL fragments
//!
//! GitHub rejects documents that define fragments they never spread, so
//! every document is assembled with [`document`] from exactly the fragments
//! its selection needs. Every polymorphic selection asks for `__typename`,
//! which the response types dispatch on.

/// `id`, `name` and `dataType` of any field configuration
pub const FIELD_COMMON_FRAGMENT: &str = r#"
fragment FieldCommonFragment on ProjectV2FieldConfiguration {
  ... on ProjectV2FieldCommon {
    id
    name
    dataType
  }
}
"#;

/// Every field value variant an item can carry
pub const FIELD_VALUE_FRAGMENT: &str = r#"
fragment FieldValueFragment on ProjectV2ItemFieldValue {
  __typename
  ... on ProjectV2ItemFieldTextValue {
    text
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldNumberValue {
    number
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldDateValue {
    date
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldSingleSelectValue {
    optionId
    name
    description
    color
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldIterationValue {
    iterationId
    title
    startDate
    duration
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldRepositoryValue {
    repository { id name nameWithOwner url }
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldUserValue {
    users(first: 10) { totalCount nodes { id login avatarUrl } }
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldLabelValue {
    labels(first: 20) { totalCount nodes { id name color description } }
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldMilestoneValue {
    milestone { id title state dueOn }
    field { ...FieldCommonFragment }
  }
  ... on ProjectV2ItemFieldPullRequestValue {
    pullRequests(first: 10) { totalCount nodes { id number title url } }
    field { ...FieldCommonFragment }
  }
}
"#;

/// Field definitions with single-select options and iteration configuration
pub const FIELD_DEFINITION_FRAGMENT: &str = r#"
fragment FieldDefinitionFragment on ProjectV2FieldConfiguration {
  __typename
  ... on ProjectV2Field {
    id
    name
    dataType
  }
  ... on ProjectV2SingleSelectField {
    id
    name
    dataType
    options { id name color description }
  }
  ... on ProjectV2IterationField {
    id
    name
    dataType
    configuration {
      duration
      startDay
      iterations { id title startDate duration }
    }
  }
}
"#;

pub const ISSUE_FRAGMENT: &str = r#"
fragment IssueFragment on Issue {
  id
  number
  title
  body
  state
  stateReason
  url
  createdAt
  updatedAt
  closedAt
  author { login avatarUrl }
  assignees(first: 10) { totalCount nodes { id login avatarUrl } }
  labels(first: 20) { totalCount nodes { id name color description } }
  milestone { id title state dueOn }
  comments { totalCount }
  reactions { totalCount }
  repository { id name nameWithOwner url }
}
"#;

pub const PULL_REQUEST_FRAGMENT: &str = r#"
fragment PullRequestFragment on PullRequest {
  id
  number
  title
  body
  state
  url
  isDraft
  createdAt
  updatedAt
  closedAt
  mergedAt
  mergeable
  reviewDecision
  additions
  deletions
  changedFiles
  headRefName
  baseRefName
  author { login avatarUrl }
  assignees(first: 10) { totalCount nodes { id login avatarUrl } }
  labels(first: 20) { totalCount nodes { id name color description } }
  milestone { id title state dueOn }
  comments { totalCount }
  reviews { totalCount }
  repository { id name nameWithOwner url }
}
"#;

pub const DRAFT_ISSUE_FRAGMENT: &str = r#"
fragment DraftIssueFragment on DraftIssue {
  id
  title
  body
  createdAt
  updatedAt
  creator { login avatarUrl }
}
"#;

/// Item with full content and every field value
pub const PROJECT_ITEM_FRAGMENT: &str = r#"
fragment ProjectItemFragment on ProjectV2Item {
  id
  type
  isArchived
  createdAt
  updatedAt
  creator { login avatarUrl }
  content {
    __typename
    ... on Issue { ...IssueFragment }
    ... on PullRequest { ...PullRequestFragment }
    ... on DraftIssue { ...DraftIssueFragment }
  }
  fieldValues(first: 50) {
    totalCount
    nodes { ...FieldValueFragment }
  }
}
"#;

/// Item with field values but only the content discriminant
pub const PROJECT_ITEM_BASIC_FRAGMENT: &str = r#"
fragment ProjectItemFragment on ProjectV2Item {
  id
  type
  isArchived
  createdAt
  updatedAt
  content { __typename }
  fieldValues(first: 50) {
    totalCount
    nodes { ...FieldValueFragment }
  }
}
"#;

/// Board metadata shared by the list and get queries
pub const PROJECT_SUMMARY_FRAGMENT: &str = r#"
fragment ProjectSummaryFragment on ProjectV2 {
  id
  number
  title
  shortDescription
  readme
  public
  closed
  url
  createdAt
  updatedAt
  items { totalCount }
}
"#;

/// Join an operation with the fragments it spreads
pub fn document(operation: &str, fragments: &[&str]) -> String {
    let mut doc = operation.trim().to_string();
    for fragment in fragments {
        doc.push('\n');
        doc.push_str(fragment.trim());
    }
    doc
}

/// Fragments behind `...ProjectItemFragment`
pub fn project_item_fragments(include_content: bool) -> Vec<&'static str> {
    if include_content {
        vec![
            PROJECT_ITEM_FRAGMENT,
            ISSUE_FRAGMENT,
            PULL_REQUEST_FRAGMENT,
            DRAFT_ISSUE_FRAGMENT,
            FIELD_VALUE_FRAGMENT,
            FIELD_COMMON_FRAGMENT,
        ]
    } else {
        vec![PROJECT_ITEM_BASIC_FRAGMENT, FIELD_VALUE_FRAGMENT, FIELD_COMMON_FRAGMENT]
    }
}

/// A board's items page with the matching item fragment
pub fn build_project_cards_query(include_content: bool) -> String {
    document(
        r#"
query ProjectCards($id: ID!, $first: Int!, $after: String) {
  node(id: $id) {
    ... on ProjectV2 {
      id
      title
      items(first: $first, after: $after) {
        totalCount
        pageInfo { endCursor hasNextPage }
        nodes { ...ProjectItemFragment }
      }
    }
  }
}
"#,
        &project_item_fragments(include_content),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn identifier(rest: &str) -> String {
        rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect()
    }

    /// Names spread with `...Name` (inline fragments `... on` excluded)
    pub(crate) fn spreads(doc: &str) -> BTreeSet<String> {
        doc.match_indices("...")
            .map(|(i, _)| doc[i + 3..].trim_start())
            .filter(|rest| !rest.starts_with("on "))
            .map(identifier)
            .collect()
    }

    pub(crate) fn definitions(doc: &str) -> BTreeSet<String> {
        doc.match_indices("fragment ")
            .map(|(i, _)| identifier(&doc[i + "fragment ".len()..]))
            .collect()
    }

    /// Every spread is defined and every definition is spread
    pub(crate) fn assert_closed(doc: &str) {
        assert_eq!(spreads(doc), definitions(doc), "fragment mismatch in:\n{doc}");
    }

    #[test]
    fn test_cards_query_with_content_is_closed() {
        let doc = build_project_cards_query(true);
        assert_closed(&doc);
        assert!(doc.contains("fragment IssueFragment"));
        assert!(doc.contains("fragment DraftIssueFragment"));
    }

    #[test]
    fn test_cards_query_without_content_is_closed() {
        let doc = build_project_cards_query(false);
        assert_closed(&doc);
        assert!(!doc.contains("IssueFragment"));
        assert!(!doc.contains("PullRequestFragment"));
        assert!(doc.contains("content { __typename }"));
    }

    #[test]
    fn test_polymorphic_fragments_request_typename() {
        for fragment in [FIELD_VALUE_FRAGMENT, FIELD_DEFINITION_FRAGMENT, PROJECT_ITEM_FRAGMENT] {
            assert!(fragment.contains("__typename"));
        }
    }

    #[test]
    fn test_document_starts_with_operation() {
        let doc = document("query Q { viewer { login } }", &[DRAFT_ISSUE_FRAGMENT]);
        assert!(doc.starts_with("query Q"));
        assert!(doc.ends_with('}'));
    }
}
