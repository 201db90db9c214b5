use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const MAX_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 1800;

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing API key selects the local responder.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub llm_timeout: Duration,
    /// Sessions untouched for this long are evicted.
    pub session_idle_timeout: Duration,
    pub content_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = optional("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let timeout_secs = match optional("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 || timeout_secs > MAX_LLM_TIMEOUT_SECS {
            bail!("LLM_TIMEOUT_SECS must be between 1 and {MAX_LLM_TIMEOUT_SECS}, got {timeout_secs}");
        }

        let idle_secs = match optional("SESSION_IDLE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("SESSION_IDLE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        };
        if idle_secs == 0 {
            bail!("SESSION_IDLE_TIMEOUT_SECS must be at least 1");
        }

        Ok(Config {
            port,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            anthropic_model: optional("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            anthropic_base_url: optional("ANTHROPIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(timeout_secs),
            session_idle_timeout: Duration::from_secs(idle_secs),
            content_path: optional("PORTFOLIO_CONTENT_PATH").map(PathBuf::from),
        })
    }
}
