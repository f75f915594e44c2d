//! Tool server configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! (`API_PORT`, `DEBUG_MODE`, `COMMAND_TIMEOUT`), then command-line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::SessionLimits;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Tools probed by `/health`
    #[serde(default = "default_essential_tools")]
    pub essential_tools: Vec<String>,
    /// Directory for resource scripts; the system temp dir when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5001
}
fn default_command_timeout() -> u64 {
    180
}
fn default_grace_period() -> u64 {
    5
}
fn default_shell() -> String {
    "/bin/sh".to_string()
}
fn default_essential_tools() -> Vec<String> {
    ["nmap", "gobuster", "dirb", "nikto"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            log_json: false,
            command_timeout_secs: default_command_timeout(),
            grace_period_secs: default_grace_period(),
            shell: default_shell(),
            essential_tools: default_essential_tools(),
            scratch_dir: None,
        }
    }
}

impl ServerConfig {
    /// Read `path` if given, otherwise start from defaults.
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

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("API_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid API_PORT: {port}"))?;
        }
        if let Some(debug) = lookup("DEBUG_MODE") {
            self.debug = parse_bool(&debug);
        }
        if let Some(timeout) = lookup("COMMAND_TIMEOUT") {
            self.command_timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid COMMAND_TIMEOUT: {timeout}"))?;
        }
        Ok(())
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            timeout: Duration::from_secs(self.command_timeout_secs),
            grace_period: Duration::from_secs(self.grace_period_secs),
            shell: self.shell.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}
