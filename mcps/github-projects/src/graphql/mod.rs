//! GraphQL document building and error interpretation
//!
//! - [`fragments`]: reusable selection fragments and document assembly
//! - [`errors`]: parsing, classification and formatting of GraphQL errors
//! - [`ids`]: prefix checks for project, column and item node IDs

pub mod errors;
pub mod fragments;
pub mod ids;

pub use errors::{
    classify, format_graphql_error, not_found_message, parse_graphql_error, permission_denied_message, GraphQLError,
    GraphQLErrors,
};
pub use ids::{validate_column_id, validate_item_id, validate_project_id, InvalidId};
