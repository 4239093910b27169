use axum::{
    routing::{any_service, get},
    Router,
};
use std::sync::Arc;

use crate::infra::mcp::make_factory;
use crate::infra::runtime::mcp_transport::{make_sse_router, make_streamable_http_service};
use crate::tools::dispatch::Dispatcher;

/// `/healthz`, streamable MCP at `/mcp`, and the two-endpoint SSE transport
/// (`GET /sse`, `POST /messages/`). Must be called inside a Tokio runtime:
/// SSE sessions are accepted on a spawned task.
pub fn build_app(dispatcher: Dispatcher) -> Router {
    let factory = make_factory(dispatcher);
    let mcp_service = make_streamable_http_service(factory.clone(), Arc::default());

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
        .merge(make_sse_router(factory))
}
