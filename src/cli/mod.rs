use clap::{Parser, Subcommand};
use rmcp::model::{Resource, Tool};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::infra::boot::serve;
use crate::infra::config::AppConfig;
use crate::infra::runtime::runner::DEFAULT_PORT;
use crate::tools::catalog::list_tools;
use crate::tools::resources::list_resources;

#[derive(Parser, Debug)]
#[command(name = "openmetadata-mcp-gateway")]
#[command(about = "MCP gateway for the OpenMetadata catalog API")]
#[command(version)]
pub struct Cli {
    /// Transport to serve: stdio or sse
    #[arg(long, default_value = "stdio")]
    pub transport: String,

    /// Port for the sse transport
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tool and resource catalogs as JSON
    Catalog,
    /// Load and validate configuration without starting the gateway
    ValidateConfig,
    /// Health check a running HTTP gateway
    Health {
        /// Gateway base URL
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    run_cli(cli).await
}

pub async fn run_cli(cli: Cli) -> ExitCode {
    match cli.command {
        Some(command) => run_command(command, cli.config.as_deref()).await,
        None => {
            let served = serve(&cli.transport, cli.port, cli.config.as_deref()).await;
            match served {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "gateway stopped");
                    eprintln!("❌ {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

pub async fn run_command(command: Commands, config: Option<&Path>) -> ExitCode {
    match command {
        Commands::Catalog => match catalog_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Could not render catalog: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::ValidateConfig => match AppConfig::load(config) {
            Ok(cfg) => {
                println!("✅ Configuration is valid (host: {})", cfg.openmetadata.host);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(()) => {
                println!("✅ Gateway is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

#[derive(Serialize)]
struct Catalog {
    tools: Vec<Tool>,
    resources: Vec<Resource>,
}

fn catalog_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Catalog {
        tools: list_tools().iter().map(|t| t.to_mcp()).collect(),
        resources: list_resources().iter().map(|r| r.to_mcp()).collect(),
    })
}

async fn health_check(url: &str) -> anyhow::Result<()> {
    let response = reqwest::Client::new()
        .get(format!("{}/healthz", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("HTTP {}", response.status())
    }
}
