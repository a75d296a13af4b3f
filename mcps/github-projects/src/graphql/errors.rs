//! GraphQL error parsing, classification and formatting
//!
//! GitHub reports most failures as an `errors` array next to (possibly
//! partial) data. Transports may also surface them only as text, so
//! [`parse_graphql_error`] accepts either form. [`format_graphql_error`]
//! turns the result into a message with an actionable hint where one is
//! known.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::github::GitHubError;

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    /// Response path segments, strings or list indices
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    /// GitHub's error category, e.g. `NOT_FOUND` or `FORBIDDEN`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// `type`, falling back to `extensions.code`
    pub fn kind(&self) -> Option<&str> {
        self.error_type.as_deref().or_else(|| {
            self.extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .and_then(Value::as_str)
        })
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some("NOT_FOUND")
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind() == Some("FORBIDDEN")
    }

    /// `a.b.0`, or `None` without a path
    pub fn path_string(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        let segments: Vec<String> = self
            .path
            .iter()
            .map(|segment| match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        Some(segments.join("."))
    }
}

/// A non-empty list of GraphQL errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLErrors {
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLErrors {
    pub fn is_forbidden(&self) -> bool {
        self.errors.iter().any(GraphQLError::is_forbidden)
    }
}

impl From<Vec<GraphQLError>> for GraphQLErrors {
    fn from(errors: Vec<GraphQLError>) -> Self {
        Self { errors }
    }
}

impl From<GraphQLError> for GraphQLErrors {
    fn from(error: GraphQLError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for GraphQLErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("unknown GraphQL error");
        }
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Lowercase substrings that mark plain text as a GraphQL error
const RECOGNIZED_PATTERNS: [&str; 4] = [
    "could not resolve to",
    "was not found",
    "must be a member",
    "insufficient scopes",
];

/// Remediation hints, first match wins
const REMEDIATIONS: &[(&str, &str)] = &[
    (
        "could not resolve to a node with the global id",
        "This usually means the item was deleted or you don't have permission to access it.",
    ),
    (
        "must be a member of the",
        "You need to be a member of the organization to perform this action.",
    ),
    (
        "insufficient scopes",
        "Your GitHub token needs additional permissions. Check the required scopes in the documentation.",
    ),
    (
        "was not found",
        "Verify that the ID is correct and that you have access to this resource.",
    ),
];

/// Remediation hint for a known error message
pub fn classify(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    REMEDIATIONS
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, hint)| *hint)
}

/// Structured errors from arbitrary error text
pub fn parse_error_text(text: &str) -> Option<GraphQLErrors> {
    if let Ok(parsed) = serde_json::from_str::<GraphQLErrors>(text) {
        if !parsed.errors.is_empty() {
            return Some(parsed);
        }
    }

    let lower = text.to_lowercase();
    if RECOGNIZED_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return Some(GraphQLError::new(text).into());
    }

    None
}

/// Structured errors carried by, or recoverable from, a client error
pub fn parse_graphql_error(err: &GitHubError) -> Option<GraphQLErrors> {
    match err {
        GitHubError::GraphQL(errors) if !errors.errors.is_empty() => Some(errors.clone()),
        GitHubError::Status { body, .. } => parse_error_text(body),
        other => parse_error_text(&other.to_string()),
    }
}

fn format_single(error: &GraphQLError) -> String {
    let mut text = error.message.clone();
    if let Some(path) = error.path_string() {
        text.push_str(&format!(" (at path: {path})"));
    }
    if let Some(hint) = classify(&error.message) {
        if !text.contains(hint) {
            text.push('\n');
            text.push_str(hint);
        }
    }
    text
}

/// Format structured errors for display
pub fn format_errors(errors: &GraphQLErrors) -> String {
    match errors.errors.as_slice() {
        [] => errors.to_string(),
        [single] => format_single(single),
        many => {
            let mut text = String::from("Multiple errors:");
            for (i, error) in many.iter().enumerate() {
                text.push_str(&format!("\n{}. {}", i + 1, format_single(error)));
            }
            text
        }
    }
}

/// User-facing text for a client error
pub fn format_graphql_error(err: &GitHubError) -> String {
    match parse_graphql_error(err) {
        Some(errors) => format_errors(&errors),
        None => err.to_string(),
    }
}

/// Message for a lookup that returned a null node
pub fn not_found_message(resource: &str, id: &str) -> String {
    let mut message = format!("{} with ID '{}' not found.", capitalize(resource), id);
    let suggestion = match resource {
        "project" | "board" => Some("Use list_project_boards to find valid project IDs."),
        "column" => Some("Use list_project_columns to find valid column IDs."),
        "card" | "item" => Some("Use list_project_cards to find valid card IDs."),
        "field" => Some("Use get_project_board with include_fields=true to find valid field IDs."),
        _ => None,
    };
    if let Some(suggestion) = suggestion {
        message.push(' ');
        message.push_str(suggestion);
    }
    message
}

/// Message for a `FORBIDDEN` error
pub fn permission_denied_message(action: &str, resource: &str) -> String {
    format!(
        "Permission denied: Cannot {action} {resource}. Ensure your GitHub token has the 'project' scope \
         and you have appropriate access to this {resource}."
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MEMBER_HINT: &str = "You need to be a member of the organization to perform this action.";

    #[test]
    fn test_parse_json_errors() {
        let text = json!({
            "errors": [{
                "message": "Could not resolve to a ProjectV2 with the number 7.",
                "type": "NOT_FOUND",
                "path": ["organization", "projectV2"]
            }]
        })
        .to_string();
        let parsed = parse_error_text(&text).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].is_not_found());
        assert_eq!(parsed.errors[0].path_string().as_deref(), Some("organization.projectV2"));
    }

    #[test]
    fn test_parse_recognized_text() {
        let parsed = parse_error_text("Resource was NOT FOUND... was not found").unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "Resource was NOT FOUND... was not found");

        let parsed = parse_error_text("INSUFFICIENT SCOPES for token").unwrap();
        assert_eq!(parsed.errors[0].message, "INSUFFICIENT SCOPES for token");
    }

    #[test]
    fn test_single_error_converts() {
        let errors = GraphQLErrors::from(GraphQLError::new("only"));
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.to_string(), "only");
    }

    #[test]
    fn test_parse_unrecognized_text() {
        assert!(parse_error_text("connection reset by peer").is_none());
        assert!(parse_error_text(r#"{"errors": []}"#).is_none());
    }

    #[test]
    fn test_classify_priority() {
        // matches both the global-id and the generic not-found rule
        let msg = "Could not resolve to a node with the global id of 'PVTI_x' was not found";
        assert_eq!(
            classify(msg),
            Some("This usually means the item was deleted or you don't have permission to access it.")
        );
        assert_eq!(
            classify("Repository was not found"),
            Some("Verify that the ID is correct and that you have access to this resource.")
        );
        assert_eq!(classify("Something else"), None);
    }

    #[test]
    fn test_format_single_with_path_and_hint() {
        let err = GitHubError::GraphQL(
            vec![GraphQLError {
                message: "Could not resolve to a node with the global id of 'PVT_x'".to_string(),
                path: vec![json!("node"), json!("items"), json!(0)],
                ..Default::default()
            }]
            .into(),
        );
        let text = format_graphql_error(&err);
        assert!(text.starts_with("Could not resolve to a node with the global id of 'PVT_x' (at path: node.items.0)"));
        assert!(text.ends_with("This usually means the item was deleted or you don't have permission to access it."));
    }

    #[test]
    fn test_member_hint_appended_once() {
        let err = GitHubError::GraphQL(vec![GraphQLError::new("User must be a member of the organization")].into());
        let text = format_graphql_error(&err);
        assert_eq!(text.matches(MEMBER_HINT).count(), 1);

        // message already carrying the hint is not extended again
        let already = GitHubError::GraphQL(
            vec![GraphQLError::new(format!("must be a member of the org. {MEMBER_HINT}"))].into(),
        );
        assert_eq!(format_graphql_error(&already).matches(MEMBER_HINT).count(), 1);
    }

    #[test]
    fn test_format_multiple() {
        let err = GitHubError::GraphQL(vec![GraphQLError::new("first"), GraphQLError::new("second")].into());
        assert_eq!(format_graphql_error(&err), "Multiple errors:\n1. first\n2. second");
    }

    #[test]
    fn test_format_unparseable_is_verbatim() {
        let err = GitHubError::CommandFailed {
            code: 1,
            stderr: "HTTP 502".to_string(),
        };
        assert_eq!(format_graphql_error(&err), "gh command failed (exit code 1): HTTP 502");
    }

    #[test]
    fn test_format_status_body() {
        let err = GitHubError::Status {
            status: 401,
            body: json!({"errors": [{"message": "Your token has insufficient scopes"}]}).to_string(),
        };
        let text = format_graphql_error(&err);
        assert!(text.starts_with("Your token has insufficient scopes\n"));
        assert!(text.contains("additional permissions"));
    }

    #[test]
    fn test_kind_from_extensions() {
        let error: GraphQLError =
            serde_json::from_value(json!({"message": "nope", "extensions": {"code": "FORBIDDEN"}})).unwrap();
        assert!(error.is_forbidden());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            not_found_message("project", "PVT_1"),
            "Project with ID 'PVT_1' not found. Use list_project_boards to find valid project IDs."
        );
        assert_eq!(
            not_found_message("field", "PVTF_1"),
            "Field with ID 'PVTF_1' not found. Use get_project_board with include_fields=true to find valid field IDs."
        );
        assert_eq!(not_found_message("widget", "w"), "Widget with ID 'w' not found.");
    }

    #[test]
    fn test_permission_denied_message() {
        let text = permission_denied_message("delete", "project board");
        assert!(text.starts_with("Permission denied: Cannot delete project board."));
        assert!(text.ends_with("access to this project board."));
    }

    #[test]
    fn test_display_joins_messages() {
        let errors: GraphQLErrors = vec![GraphQLError::new("a"), GraphQLError::new("b")].into();
        assert_eq!(errors.to_string(), "a; b");
        assert_eq!(GraphQLErrors::default().to_string(), "unknown GraphQL error");
    }
}
