//! Parameter types for GitHub Projects MCP tools
//!
//! Organized by domain: board, column, card. [`ToolArgs`] wraps them at the
//! server boundary so malformed arguments become tool-level errors.

mod args;
mod board;
mod card;
mod column;

pub use args::*;
pub use board::*;
pub use card::*;
pub use column::*;

/// Default page size for list tools
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page GitHub serves
pub const MAX_LIMIT: u32 = 100;

/// Apply the default (also for 0) and cap at [`MAX_LIMIT`]
pub fn effective_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => DEFAULT_LIMIT,
        Some(n) => n.min(MAX_LIMIT),
    }
}

/// The string, unless it is missing or blank
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None), 20);
        assert_eq!(effective_limit(Some(0)), 20);
        assert_eq!(effective_limit(Some(5)), 5);
        assert_eq!(effective_limit(Some(100)), 100);
        assert_eq!(effective_limit(Some(500)), 100);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
