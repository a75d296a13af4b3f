//! MCP Server implementation
//!
//! Exposes GitHub Projects (v2) boards, columns and cards as tools. Every
//! tool decodes its arguments leniently, delegates to a handler and maps
//! the outcome with [`handlers::respond`].

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use std::sync::Arc;

use crate::config::GitHubConfig;
use crate::github::{ClientFactory, TransportFactory};
use crate::handlers;
use crate::params::*;

/// The GitHub Projects MCP Server
///
/// Holds no state besides the client factory; a new GraphQL client is
/// obtained for every tool call.
#[derive(Clone)]
pub struct GitHubProjectsMcpServer {
    factory: Arc<dyn ClientFactory>,
    tool_router: ToolRouter<Self>,
}

impl Default for GitHubProjectsMcpServer {
    fn default() -> Self {
        Self::new(GitHubConfig::default())
    }
}

#[tool_router]
impl GitHubProjectsMcpServer {
    pub fn new(config: GitHubConfig) -> Self {
        Self::with_factory(Arc::new(TransportFactory::new(config)))
    }

    pub fn with_factory(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            tool_router: Self::tool_router(),
        }
    }

    // ========================================================================
    // Board Tools
    // ========================================================================

    #[tool(description = "Create a GitHub Projects (v2) board for a user or organization, optionally linked to a repository")]
    async fn create_project_board(
        &self,
        Parameters(args): Parameters<ToolArgs<CreateProjectBoardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::create_project_board(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Update the title, description, short description, visibility or closed state of a project board")]
    async fn update_project_board(
        &self,
        Parameters(args): Parameters<ToolArgs<UpdateProjectBoardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::update_project_board(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Delete a project board permanently (requires confirm=true)")]
    async fn delete_project_board(
        &self,
        Parameters(args): Parameters<ToolArgs<DeleteProjectBoardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::delete_project_board(self.factory.as_ref(), params).await)
    }

    #[tool(description = "List project boards of a user and/or organization")]
    async fn list_project_boards(
        &self,
        Parameters(args): Parameters<ToolArgs<ListProjectBoardsParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::list_project_boards(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Get a project board with its owner, item statistics and field definitions")]
    async fn get_project_board(
        &self,
        Parameters(args): Parameters<ToolArgs<GetProjectBoardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::get_project_board(self.factory.as_ref(), params).await)
    }

    // ========================================================================
    // Column Tools
    // ========================================================================

    #[tool(description = "List the columns (Status field options) of a project board with card counts")]
    async fn list_project_columns(
        &self,
        Parameters(args): Parameters<ToolArgs<ListProjectColumnsParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::list_project_columns(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Get one column of a project board with its card count")]
    async fn get_project_column(
        &self,
        Parameters(args): Parameters<ToolArgs<GetProjectColumnParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::get_project_column(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Propose a new column; GitHub offers no API for this, so the change is described but not applied")]
    async fn create_project_column(
        &self,
        Parameters(args): Parameters<ToolArgs<CreateProjectColumnParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::create_project_column(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Propose changes to a column; GitHub offers no API for this, so the change is described but not applied")]
    async fn update_project_column(
        &self,
        Parameters(args): Parameters<ToolArgs<UpdateProjectColumnParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::update_project_column(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Propose deleting a column; GitHub offers no API for this, so the change is described but not applied")]
    async fn delete_project_column(
        &self,
        Parameters(args): Parameters<ToolArgs<DeleteProjectColumnParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::delete_project_column(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Propose a new column order; GitHub offers no API for this, so the change is described but not applied")]
    async fn reorder_project_columns(
        &self,
        Parameters(args): Parameters<ToolArgs<ReorderProjectColumnsParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::reorder_project_columns(self.factory.as_ref(), params).await)
    }

    // ========================================================================
    // Card Tools
    // ========================================================================

    #[tool(description = "Add an issue or pull request to a project board, optionally into a column")]
    async fn add_card_to_project(
        &self,
        Parameters(args): Parameters<ToolArgs<AddCardToProjectParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::add_card_to_project(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Move a card to another column, optionally to the top")]
    async fn move_project_card(
        &self,
        Parameters(args): Parameters<ToolArgs<MoveProjectCardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::move_project_card(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Update custom field values of a card, keyed by field name")]
    async fn update_project_card(
        &self,
        Parameters(args): Parameters<ToolArgs<UpdateProjectCardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::update_project_card(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Remove a card from its project board, or archive it")]
    async fn remove_card_from_project(
        &self,
        Parameters(args): Parameters<ToolArgs<RemoveCardFromProjectParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::remove_card_from_project(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Move several cards to one column; each card succeeds or fails on its own")]
    async fn bulk_move_cards(
        &self,
        Parameters(args): Parameters<ToolArgs<BulkMoveCardsParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::bulk_move_cards(self.factory.as_ref(), params).await)
    }

    #[tool(description = "List cards of a project board with column, content type and archive filters and cursor pagination")]
    async fn list_project_cards(
        &self,
        Parameters(args): Parameters<ToolArgs<ListProjectCardsParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::list_project_cards(self.factory.as_ref(), params).await)
    }

    #[tool(description = "Get a card with every field value and its full issue, pull request or draft content")]
    async fn get_project_card(
        &self,
        Parameters(args): Parameters<ToolArgs<GetProjectCardParams>>,
    ) -> Result<CallToolResult, McpError> {
        let params = match args.accept() {
            Ok(params) => params,
            Err(rejected) => return Ok(rejected),
        };
        handlers::respond(handlers::get_project_card(self.factory.as_ref(), params).await)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for GitHubProjectsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "GitHub Projects MCP Server - manage GitHub Projects (v2) boards, columns and cards \
                 through the GitHub GraphQL API. Columns are the options of a board's Status field. \
                 Uses the gh CLI credentials by default, or a token with the 'project' scope."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{GitHubError, GitHubResult, GraphQLClient};
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_server() -> (GitHubProjectsMcpServer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let factory = move || -> GitHubResult<Arc<dyn GraphQLClient>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(GitHubError::NotFound)
        };
        (GitHubProjectsMcpServer::with_factory(Arc::new(factory)), calls)
    }

    fn text(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(t) => t.text.clone(),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_all_tools_registered() {
        let (server, _) = counting_server();
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names.len(), 18);
        assert!(names.contains(&"bulk_move_cards".to_string()));
        assert!(names.contains(&"reorder_project_columns".to_string()));
    }

    #[tokio::test]
    async fn test_missing_parameter_never_reaches_factory() {
        let (server, calls) = counting_server();
        let result = server
            .create_project_board(Parameters(ToolArgs::from_value(json!({"owner": "octo"}))))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "missing required parameter: name");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_every_tool_rejects_empty_arguments() {
        let (server, calls) = counting_server();

        macro_rules! rejects_empty {
            ($($tool:ident),+ $(,)?) => {$(
                let result = server
                    .$tool(Parameters(ToolArgs::from_value(json!({}))))
                    .await
                    .unwrap();
                assert_eq!(result.is_error, Some(true), "{} accepted empty arguments", stringify!($tool));
                assert!(
                    text(&result).starts_with("missing required parameter: "),
                    "{}: {}",
                    stringify!($tool),
                    text(&result)
                );
            )+};
        }

        rejects_empty!(
            create_project_board,
            update_project_board,
            delete_project_board,
            list_project_boards,
            get_project_board,
            list_project_columns,
            get_project_column,
            create_project_column,
            update_project_column,
            delete_project_column,
            reorder_project_columns,
            add_card_to_project,
            move_project_card,
            update_project_card,
            remove_card_from_project,
            bulk_move_cards,
            list_project_cards,
            get_project_card,
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_enum_never_reaches_factory() {
        let (server, calls) = counting_server();
        let result = server
            .list_project_boards(Parameters(ToolArgs::from_value(json!({"owner": "octo", "type": "team"}))))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("invalid parameter: "));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_client_acquisition_failure_is_protocol_error() {
        let (server, calls) = counting_server();
        let err = server
            .get_project_card(Parameters(ToolArgs::from_value(json!({"card_id": "PVTI_1"}))))
            .await
            .unwrap_err();
        assert!(err.message.starts_with("failed to get GitHub GraphQL client"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_never_reaches_factory() {
        let (server, calls) = counting_server();
        let result = server
            .delete_project_board(Parameters(ToolArgs::from_value(json!({"board_id": "PVT_1"}))))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "deletion not confirmed - set confirm to true to delete");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
