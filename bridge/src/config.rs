//! Bridge configuration
//!
//! Layered like the tool server's: defaults, optional TOML file, environment
//! (`KALI_SERVER`, `MCP_PORT`), then command-line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::client::RemoteClient;

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the Kali tool server
    #[serde(default = "default_kali_server")]
    pub kali_server: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout for calls to the tool server
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub log_json: bool,
}

fn default_kali_server() -> String {
    "http://localhost:5001".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5002
}
fn default_timeout() -> u64 {
    300
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            kali_server: default_kali_server(),
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
            debug: false,
            log_json: false,
        }
    }
}

impl BridgeConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config from {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config from {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(server) = lookup("KALI_SERVER") {
            self.kali_server = server;
        }
        if let Some(port) = lookup("MCP_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid MCP_PORT: {port}"))?;
        }
        Ok(())
    }

    pub fn client(&self) -> RemoteClient {
        RemoteClient::new(&self.kali_server, Duration::from_secs(self.timeout_secs))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
