//! Transport selection and the long-running loops behind it.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::core::error::StartupError;
use crate::infra::http_app::build_app;
use crate::infra::mcp::GatewaySvc;
use crate::infra::runtime::mcp_transport::serve_stdio;
use crate::tools::dispatch::Dispatcher;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Sse,
}

impl FromStr for TransportKind {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportKind::Stdio),
            "sse" => Ok(TransportKind::Sse),
            other => Err(StartupError::InvalidTransport(other.to_string())),
        }
    }
}

#[async_trait::async_trait]
pub trait TransportRunner: Send {
    async fn run(self: Box<Self>) -> anyhow::Result<()>;
}

/// Single session over the process's stdin/stdout.
pub struct StdioRunner {
    dispatcher: Dispatcher,
}

#[async_trait::async_trait]
impl TransportRunner for StdioRunner {
    async fn run(self: Box<Self>) -> anyhow::Result<()> {
        tracing::info!("serving MCP over stdio");
        tokio::select! {
            res = serve_stdio(GatewaySvc::new(self.dispatcher)) => res,
            _ = shutdown_signal() => {
                tracing::info!("shutdown signal received, closing stdio session");
                Ok(())
            }
        }
    }
}

/// HTTP listener on `0.0.0.0:<port>` carrying both SSE and streamable MCP.
pub struct HttpRunner {
    dispatcher: Dispatcher,
    port: u16,
}

#[async_trait::async_trait]
impl TransportRunner for HttpRunner {
    async fn run(self: Box<Self>) -> anyhow::Result<()> {
        let addr: SocketAddr = ([0, 0, 0, 0], self.port).into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "serving MCP over HTTP: streamable at /mcp, SSE at /sse");

        let app = build_app(self.dispatcher);
        tokio::select! {
            res = axum::serve(listener, app).into_future() => res.map_err(Into::into),
            _ = shutdown_signal() => {
                tracing::info!("shutdown signal received, stopping listener");
                Ok(())
            }
        }
    }
}

pub fn select_runner(
    kind: TransportKind,
    port: u16,
    dispatcher: Dispatcher,
) -> Box<dyn TransportRunner> {
    match kind {
        TransportKind::Stdio => Box::new(StdioRunner { dispatcher }),
        TransportKind::Sse => Box::new(HttpRunner { dispatcher, port }),
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
