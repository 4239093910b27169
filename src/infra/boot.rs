use std::path::Path;
use std::sync::Arc;

use crate::clients::OpenMetadataRemote;
use crate::core::error::StartupError;
use crate::infra::config::AppConfig;
use crate::infra::runtime::runner::{select_runner, TransportKind};
use crate::tools::dispatch::Dispatcher;

/// Validate the transport, load configuration, build the client and run the
/// selected transport until it finishes.
pub async fn serve(transport: &str, port: u16, config: Option<&Path>) -> anyhow::Result<()> {
    let kind: TransportKind = transport.parse()?;
    let cfg = AppConfig::load(config).map_err(StartupError::from)?;
    tracing::info!(
        transport = ?kind,
        port,
        host = %cfg.openmetadata.host,
        "BOOT openmetadata-mcp-gateway"
    );

    let client = OpenMetadataRemote::from_config(&cfg.openmetadata).map_err(StartupError::from)?;
    let dispatcher = Dispatcher::new(Arc::new(client));
    select_runner(kind, port, dispatcher).run().await
}
