//! Flowlog MCP server binary
//!
//! Serves the log tools over stdio. Stdout carries the protocol, so all
//! diagnostics go to stderr.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use flowlog_client::LogsClient;
use flowlog_mcp::config::{Config, DEFAULT_BASE_URL};
use flowlog_mcp::server::Server;
use flowlog_mcp::stdio;
use flowlog_mcp::tools::ToolRegistry;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flowlog-mcp")]
#[command(about = "MCP server exposing workflow execution logs as tools", long_about = None)]
struct Cli {
    /// Base URL of the backend API
    #[arg(long, env = "FLOWLOG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Tenant appended to the base URL
    #[arg(long, env = "FLOWLOG_TENANT")]
    tenant: Option<String>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, env = "FLOWLOG_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.base_url);
        if let Some(tenant) = self.tenant {
            config = config.with_tenant(tenant);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowlog_mcp=info,flowlog_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();
    config.validate().context("Invalid configuration")?;

    let client = LogsClient::with_client(&config.api_url()?, config.http_client()?)
        .context("Failed to create log API client")?;

    let registry = ToolRegistry::with_log_tools();
    tracing::info!(
        "Starting Flowlog MCP server for {} ({} tools)",
        client.base_url(),
        registry.len()
    );

    let server = Arc::new(Server::new(registry, client));
    stdio::serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("Flowlog MCP server stopped");
    Ok(())
}
