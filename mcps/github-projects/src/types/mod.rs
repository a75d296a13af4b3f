//! Serde models of GitHub Projects (v2) GraphQL responses
//!
//! Polymorphic nodes (field values, item content, project owners, field
//! definitions) are internally tagged enums keyed by `__typename`, each with
//! an `Unknown` arm so new GitHub types never break decoding.

pub mod common;
pub mod content;
pub mod field;
pub mod item;
pub mod project;

pub use common::{Actor, Connection, Count, Label, Milestone, NodeId, PageInfo, RepositoryRef};
pub use content::{DraftIssueContent, IssueContent, ItemContent, PullRequestContent};
pub use field::{FieldRef, FieldValue};
pub use item::{ItemProject, ProjectItem};
pub use project::{FieldDefinition, Project, ProjectOwner, SingleSelectField, SingleSelectOption};
