//! Configuration for MediOps
//!
//! Values resolve in this order: CLI flags > env vars (handled by clap) >
//! `~/.mediops/config.toml` > defaults.

use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MediOpsError, Result};
use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::session::DEFAULT_HANDOFF_DELAY;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Env var the browser-era deployment used for the key
const LEGACY_API_KEY_VAR: &str = "API_KEY";

/// Contents of `~/.mediops/config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Gemini API key
    pub api_key: Option<String>,

    /// Gemini model name
    pub model: Option<String>,

    /// Base URL of the models endpoint
    pub api_base: Option<String>,

    pub timeout_secs: Option<u64>,

    pub handoff_delay_ms: Option<u64>,

    pub host: Option<String>,

    pub port: Option<u16>,
}

impl Config {
    /// Load config from ~/.mediops/config.toml, falling back to defaults
    pub fn load() -> Self {
        let path = config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| MediOpsError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Directory holding config, .env and REPL history
pub fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".mediops")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Settings that can be given on the command line
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model used for routing and execution
    #[arg(long, env = "MEDIOPS_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Gemini models endpoint
    #[arg(long, env = "MEDIOPS_API_BASE")]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Pause between routing and execution, in milliseconds
    #[arg(long)]
    pub handoff_delay_ms: Option<u64>,

    /// HTTP bind host (serve mode)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (serve mode)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub handoff_delay: Duration,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Merge CLI args (already including env vars) over the config file
    pub fn resolve(args: SettingsArgs, config: Config) -> Self {
        let api_key = args
            .api_key
            .or(config.api_key)
            .or_else(|| std::env::var(LEGACY_API_KEY_VAR).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            api_key,
            model: args
                .model
                .or(config.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: args
                .api_base
                .or(config.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(
                args.timeout_secs
                    .or(config.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            handoff_delay: args
                .handoff_delay_ms
                .or(config.handoff_delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_HANDOFF_DELAY),
            host: args
                .host
                .or(config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(config.port).unwrap_or(DEFAULT_PORT),
        }
    }

    /// The API key; its absence is fatal for the chat UI
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(MediOpsError::MissingApiKey)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
