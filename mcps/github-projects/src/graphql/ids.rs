//! Node ID prefix checks
//!
//! Only the prefix is checked; the rest of an ID is opaque and GitHub has
//! the final say on whether it exists.

use thiserror::Error;

pub const PROJECT_ID_PREFIX: &str = "PVT_";
pub const COLUMN_ID_PREFIXES: [&str; 2] = ["PVTFSC_", "PVTSSF_"];
pub const ITEM_ID_PREFIX: &str = "PVTI_";

/// An ID that cannot belong to the expected kind of node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidId {
    #[error("invalid project ID format: '{0}'. Project IDs should start with 'PVT_' (e.g., 'PVT_kwDOAM6J184ACzDx')")]
    Project(String),
    #[error("invalid column ID format: '{0}'. Column IDs should start with 'PVTFSC_' or 'PVTSSF_'")]
    Column(String),
    #[error("invalid item ID format: '{0}'. Item IDs should start with 'PVTI_'")]
    Item(String),
}

pub fn validate_project_id(id: &str) -> Result<(), InvalidId> {
    if id.starts_with(PROJECT_ID_PREFIX) {
        Ok(())
    } else {
        Err(InvalidId::Project(id.to_string()))
    }
}

pub fn validate_column_id(id: &str) -> Result<(), InvalidId> {
    if COLUMN_ID_PREFIXES.iter().any(|prefix| id.starts_with(prefix)) {
        Ok(())
    } else {
        Err(InvalidId::Column(id.to_string()))
    }
}

pub fn validate_item_id(id: &str) -> Result<(), InvalidId> {
    if id.starts_with(ITEM_ID_PREFIX) {
        Ok(())
    } else {
        Err(InvalidId::Item(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ids() {
        assert!(validate_project_id("PVT_kwDOAM6J184ACzDx").is_ok());
        assert!(validate_project_id("PVT_").is_ok());

        let err = validate_project_id("PVTI_abc").unwrap_err();
        assert!(err.to_string().contains("'PVTI_abc'"));
        assert!(err.to_string().contains("'PVT_'"));
        assert!(validate_project_id("").is_err());
        assert!(validate_project_id("pvt_lowercase").is_err());
    }

    #[test]
    fn test_column_ids() {
        assert!(validate_column_id("PVTFSC_lADOAM6J184ACzDxzgLd").is_ok());
        assert!(validate_column_id("PVTSSF_lADOAM6J184ACzDxzgLd").is_ok());

        let err = validate_column_id("PVT_abc").unwrap_err();
        assert!(err.to_string().contains("'PVTFSC_' or 'PVTSSF_'"));
    }

    #[test]
    fn test_item_ids() {
        assert!(validate_item_id("PVTI_lADOAM6J184ACzDxzgJ").is_ok());

        let err = validate_item_id("I_kwDOAM6J18").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid item ID format: 'I_kwDOAM6J18'. Item IDs should start with 'PVTI_'"
        );
    }
}
