//! Generic MCP transport helpers (stdio, legacy SSE, streamable HTTP) decoupled
//! from tool logic. Every session transport is wrapped in [`sequenced`], so
//! calls run in arrival order and replies are flushed before a session ends.

use std::sync::Arc;

use rmcp::serve_server;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use rmcp::transport::streamable_http_server::tower::{
    StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::transport::IntoTransport;
use rmcp::RoleServer;
use tokio::io::{AsyncRead, AsyncWrite};

pub use crate::infra::runtime::session_order::SequencedSessionManager;
pub use rmcp::ServerHandler;

use crate::infra::runtime::session_order::sequenced;

pub const SSE_PATH: &str = "/sse";
pub const SSE_POST_PATH: &str = "/messages/";

/// Serve one session over any transport rmcp accepts and wait for it to end.
pub async fn serve_session<H, T, E, A>(handler: H, transport: T) -> anyhow::Result<()>
where
    H: ServerHandler,
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
    A: 'static,
{
    let running = serve_server(handler, sequenced(transport)).await?;
    let reason = running.waiting().await?;
    tracing::info!(?reason, "mcp session closed");
    Ok(())
}

/// Serve one newline-delimited JSON-RPC session over any byte stream pair and
/// wait until the peer closes its side and every reply is written.
pub async fn serve_stream<H, R, W>(handler: H, reader: R, writer: W) -> anyhow::Result<()>
where
    H: ServerHandler,
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    serve_session(handler, (reader, writer)).await
}

pub async fn serve_stdio<H>(handler: H) -> anyhow::Result<()>
where
    H: ServerHandler,
{
    serve_stream(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Streamable HTTP service; `factory` is called once per new session.
pub fn make_streamable_http_service<H>(
    factory: impl Fn() -> H + Send + Sync + 'static,
    session_mgr: Arc<SequencedSessionManager>,
) -> StreamableHttpService<H, SequencedSessionManager>
where
    H: ServerHandler,
{
    let cfg = StreamableHttpServerConfig::default();
    tracing::debug!(
        stateful_mode = cfg.stateful_mode,
        keep_alive = ?cfg.sse_keep_alive,
        "streamable http config"
    );
    StreamableHttpService::new(move || Ok(factory()), session_mgr, cfg)
}

/// Two-endpoint SSE: `GET /sse` opens the event stream and announces the
/// `POST /messages/?sessionId=..` endpoint. Sessions are accepted on a
/// background task for as long as the returned router is alive.
pub fn make_sse_router<H>(factory: impl Fn() -> H + Send + 'static) -> axum::Router
where
    H: ServerHandler,
{
    let (mut sse, router) = SseServer::new(SseServerConfig {
        // unused: the router is mounted by the caller's listener
        bind: ([0, 0, 0, 0], 0).into(),
        sse_path: SSE_PATH.to_string(),
        post_path: SSE_POST_PATH.to_string(),
        ct: Default::default(),
        sse_keep_alive: None,
    });
    tokio::spawn(async move {
        while let Some(transport) = sse.next_transport().await {
            tracing::debug!("sse session opened");
            let handler = factory();
            tokio::spawn(async move {
                if let Err(e) = serve_session(handler, transport).await {
                    tracing::warn!(error = %e, "sse session failed");
                }
            });
        }
    });
    router
}
