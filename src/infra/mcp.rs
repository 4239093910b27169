//! MCP server handler shared by the stdio, SSE and streamable HTTP transports.
//!
//! - `tools/list` / `resources/list` answer from the static catalogs
//! - `tools/call` goes through the [`Dispatcher`] once the session transport
//!   says it is the call's turn
//!
//! Every tool failure, including an unknown tool name, comes back as ordinary
//! text content.

use std::future::Future;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListResourcesResult,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};

use crate::core::content::InvocationResult;
use crate::infra::runtime::session_order::Ticket;
use crate::tools::catalog::list_tools;
use crate::tools::dispatch::Dispatcher;
use crate::tools::resources::list_resources;

pub const SERVER_NAME: &str = "openmetadata-mcp-gateway";

/// One handler per session.
#[derive(Clone)]
pub struct GatewaySvc {
    dispatcher: Dispatcher,
}

impl GatewaySvc {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run a single `tools/call`.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = arguments.unwrap_or_default();
        tracing::debug!(tool = %name, "tools/call");
        let result = match self.dispatcher.dispatch(name, &arguments).await {
            Ok(result) => result,
            Err(e) => InvocationResult::error(&e),
        };
        Ok(result.into())
    }
}

/// Factory producing a fresh handler per session.
pub fn make_factory(
    dispatcher: Dispatcher,
) -> impl Fn() -> GatewaySvc + Clone + Send + Sync + 'static {
    move || GatewaySvc::new(dispatcher.clone())
}

impl ServerHandler for GatewaySvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Query and manage OpenMetadata tables, glossaries and glossary terms.".to_string(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = list_tools().iter().map(|t| t.to_mcp()).collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = list_resources().iter().map(|r| r.to_mcp()).collect();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let ticket = context.extensions.get::<Ticket>().cloned();
        async move {
            if let Some(ticket) = &ticket {
                ticket.turn().await;
                tracing::trace!(seq = ticket.seq(), "call admitted");
            }
            self.invoke(&request.name, request.arguments).await
        }
    }
}
