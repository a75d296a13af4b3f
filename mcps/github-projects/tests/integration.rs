//! Integration tests for the github-projects MCP server
//!
//! These tests talk to the real GitHub GraphQL API through the gh CLI.
//! They require:
//! - gh CLI installed and authenticated with the `project` scope
//! - Network access to GitHub
//!
//! # Running tests
//!
//! ```bash
//! # Run read-only tests (safe, no side effects)
//! TEST_OWNER=octocat cargo test --test integration -- --ignored read_
//!
//! # Run all integration tests (includes write tests)
//! TEST_OWNER=octocat TEST_CONTENT_ID=I_kwDO... cargo test --test integration -- --ignored
//! ```
//!
//! Read tests list the boards of `TEST_OWNER` and inspect the first open
//! one. The write test creates a throwaway board, adds `TEST_CONTENT_ID`
//! to it and deletes the board again.

use std::env;
use std::process::Command;

use serde_json::Value;

use github_projects_mcp::config::GitHubConfig;
use github_projects_mcp::github::TransportFactory;
use github_projects_mcp::handlers::{self, ToolResult};
use github_projects_mcp::params::*;

fn test_owner() -> Option<String> {
    env::var("TEST_OWNER").ok().filter(|s| !s.is_empty())
}

/// Check if gh CLI is available and authenticated
fn gh_available() -> bool {
    Command::new("gh")
        .args(["auth", "status"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn factory() -> TransportFactory {
    TransportFactory::new(GitHubConfig::default())
}

fn expect_ok(result: ToolResult<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(err) => panic!("tool call failed: {:?}", err.message()),
    }
}

/// First open board of the test owner
async fn first_board(owner: &str) -> Option<String> {
    let listed = expect_ok(
        handlers::list_project_boards(
            &factory(),
            ListProjectBoardsParams {
                owner: owner.to_string(),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await,
    );
    listed["projects"]
        .as_array()
        .and_then(|p| p.first())
        .and_then(|p| p["id"].as_str())
        .map(str::to_string)
}

// ============================================================================
// READ-ONLY TESTS (safe to run anytime)
// ============================================================================

#[tokio::test]
#[ignore = "integration test - requires gh CLI and network"]
async fn read_list_boards() {
    let (true, Some(owner)) = (gh_available(), test_owner()) else {
        eprintln!("Skipping: gh CLI or TEST_OWNER not available");
        return;
    };

    let result = expect_ok(
        handlers::list_project_boards(
            &factory(),
            ListProjectBoardsParams {
                owner,
                include_closed: Some(true),
                limit: Some(5),
                ..Default::default()
            },
        )
        .await,
    );

    let projects = result["projects"].as_array().expect("projects array");
    assert_eq!(result["total_count"].as_u64(), Some(projects.len() as u64));
    for project in projects {
        assert!(project["id"].as_str().unwrap_or_default().starts_with("PVT_"));
        assert!(project["owner_type"] == "user" || project["owner_type"] == "organization");
    }
}

#[tokio::test]
#[ignore = "integration test - requires gh CLI and network"]
async fn read_board_columns_and_cards() {
    let (true, Some(owner)) = (gh_available(), test_owner()) else {
        eprintln!("Skipping: gh CLI or TEST_OWNER not available");
        return;
    };
    let Some(board_id) = first_board(&owner).await else {
        eprintln!("Skipping: {owner} has no open boards");
        return;
    };

    let board = expect_ok(
        handlers::get_project_board(
            &factory(),
            GetProjectBoardParams {
                board_id: board_id.clone(),
                ..Default::default()
            },
        )
        .await,
    );
    assert_eq!(board["id"], board_id.as_str());
    assert!(board["fields"].is_array());

    let columns = expect_ok(
        handlers::list_project_columns(
            &factory(),
            ListProjectColumnsParams {
                board_id: board_id.clone(),
            },
        )
        .await,
    );
    let counted: u64 = columns["columns"]
        .as_array()
        .expect("columns array")
        .iter()
        .filter_map(|c| c["item_count"].as_u64())
        .sum();
    assert!(counted <= columns["total_items"].as_u64().unwrap_or(0));

    let cards = expect_ok(
        handlers::list_project_cards(
            &factory(),
            ListProjectCardsParams {
                board_id,
                limit: Some(5),
                ..Default::default()
            },
        )
        .await,
    );
    assert!(cards["count"].as_u64().unwrap_or(0) <= 5);
}

#[tokio::test]
#[ignore = "integration test - requires gh CLI and network"]
async fn read_unknown_board_is_not_found() {
    if !gh_available() {
        eprintln!("Skipping: gh CLI not available");
        return;
    }

    let result = handlers::get_project_board(
        &factory(),
        GetProjectBoardParams {
            board_id: "PVT_doesnotexist000".into(),
            ..Default::default()
        },
    )
    .await;
    let message = result.expect_err("unknown board").message().unwrap_or_default();
    assert!(message.contains("PVT_doesnotexist000"), "unexpected message: {message}");
}

// ============================================================================
// WRITE TESTS (create and delete GitHub resources)
// ============================================================================

#[tokio::test]
#[ignore = "write test - creates/modifies GitHub resources"]
async fn write_board_lifecycle() {
    let (true, Some(owner), Ok(content_id)) = (gh_available(), test_owner(), env::var("TEST_CONTENT_ID")) else {
        eprintln!("Skipping: gh CLI, TEST_OWNER or TEST_CONTENT_ID not available");
        return;
    };
    let factory = factory();

    let created = expect_ok(
        handlers::create_project_board(
            &factory,
            CreateProjectBoardParams {
                name: "[TEST] Integration test board - please ignore".into(),
                owner,
                description: Some("Created by the github-projects-mcp integration tests".into()),
                ..Default::default()
            },
        )
        .await,
    );
    let board_id = created["id"].as_str().expect("board id").to_string();

    let added = handlers::add_card_to_project(
        &factory,
        AddCardToProjectParams {
            board_id: board_id.clone(),
            content_id,
            column_id: None,
        },
    )
    .await;

    // Clean up before asserting so a failure leaves nothing behind
    let deleted = handlers::delete_project_board(
        &factory,
        DeleteProjectBoardParams {
            board_id: board_id.clone(),
            confirm: true,
        },
    )
    .await;

    let added = expect_ok(added);
    assert!(added["card_id"].as_str().unwrap_or_default().starts_with("PVTI_"));
    assert_eq!(expect_ok(deleted)["id"], board_id.as_str());
}
