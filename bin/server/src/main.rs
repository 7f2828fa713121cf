//! Pearl MCP server entry point.

use clap::{Parser, ValueEnum};
use pearl_mcp_core::Result;
use pearl_mcp_server::mcp::{sse, stdio};
use pearl_mcp_server::{AppState, ServerConfig, ServerError};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MCP server exposing the Pearl question-answering API.
#[derive(Debug, Parser)]
#[command(name = "pearl-mcp-server", version)]
struct Cli {
    /// Pearl API key (overrides the PEARL_API_KEY environment variable).
    #[arg(long)]
    api_key: Option<String>,

    /// Port to listen on for SSE.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Transport type.
    #[arg(long, value_enum, default_value = "stdio")]
    transport: Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Sse,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr: with the stdio transport, stdout carries the
    // protocol.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = ServerConfig::from_env().map_err(|e| ServerError::Config {
        reason: e.to_string(),
    })?;
    if cli.api_key.is_some() {
        config.api_key = cli.api_key;
    }

    let state = Arc::new(AppState::from_config(&config)?);
    tracing::info!(base_url = %config.api_base_url, "Pearl MCP server initialized");

    match cli.transport {
        Transport::Stdio => stdio::serve(state).await?,
        Transport::Sse => sse::serve(state, cli.port).await?,
    }

    Ok(())
}
