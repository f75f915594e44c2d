//! Kali tool API server binary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kali_tools::config::ServerConfig;
use kali_tools::server::{self, AppState};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Run Kali Linux security tools over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    ip: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(ip) = args.ip {
        config.host = ip;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.debug |= args.debug;

    init_tracing(&config);
    info!("Kali tool API server starting...");
    if config.host != "127.0.0.1" && config.host != "localhost" {
        warn!(
            "Binding to {}: commands from any reachable client will run on this host",
            config.host
        );
    }

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

    server::serve(listener, AppState::new(&config), cancel).await?;
    info!("Kali tool API server stopped");
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
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
