//! Kali bridge binary — serves the tool server's functions over JSON-RPC

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kali_bridge::client::{RemoteClient, RemoteReply};
use kali_bridge::config::BridgeConfig;
use kali_bridge::dispatch::Dispatcher;
use kali_bridge::mcp::{self, McpState};
use kali_common::HealthReport;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Expose Kali tool server functions to agents over JSON-RPC")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Kali tool server URL
    #[arg(long)]
    kali_server: Option<String>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = BridgeConfig::load(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(server) = args.kali_server {
        config.kali_server = server;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    config.debug |= args.debug;

    init_tracing(&config);
    info!("Kali bridge starting...");

    let client = config.client();
    log_server_health(&client).await;

    let dispatcher = Dispatcher::new(client).context("Failed to build tool schemas")?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                shutdown.cancel();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {e}"),
        }
    });

    mcp::serve(listener, McpState::new(dispatcher), cancel).await?;
    info!("Kali bridge stopped");
    Ok(())
}

/// The bridge starts either way; an unreachable server only means tool calls
/// will fail until it comes up.
async fn log_server_health(client: &RemoteClient) {
    let url = client.base_url();
    match client.check_health().await {
        RemoteReply::Failed(e) => {
            warn!("Unable to connect to Kali API server at {url}: {e}");
            warn!("Bridge will start, but tool execution may fail");
        }
        RemoteReply::Payload(payload) => {
            info!("Successfully connected to Kali API server at {url}");
            match serde_json::from_value::<HealthReport>(payload) {
                Ok(report) => {
                    info!("Server health status: {}", report.status);
                    if !report.all_essential_tools_available {
                        warn!("Not all essential tools are available on the Kali server");
                        let missing = report.missing_tools();
                        if !missing.is_empty() {
                            warn!("Missing tools: {}", missing.join(", "));
                        }
                    }
                }
                Err(e) => warn!("Unexpected health report from {url}: {e}"),
            }
        }
    }
}

fn init_tracing(config: &BridgeConfig) {
    let level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);
    if config.log_json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
