use std::env;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    Missing(&'static str),

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm_provider: String,
    pub llm_name: String,
    pub api_key: String,
    pub llm_base_url: String,
    pub database_url: String,
    pub bind_addr: String,
    pub api_base_url: String,
    pub prompts_dir: String,
    pub log_level: String,
}

const DEFAULT_PROVIDER: &str = "anthropic";
const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const DEFAULT_LLM_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_DATABASE_URL: &str = "sqlite://tuning.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_PROMPTS_DIR: &str = "prompts";
const DEFAULT_LOG_LEVEL: &str = "info";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let api_key = get("ANTHROPIC_API_KEY").ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))?;

        let bind_addr = or_default("FT_BIND_ADDR", DEFAULT_BIND_ADDR);
        bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "FT_BIND_ADDR",
                reason: e.to_string(),
            })?;

        let database_url = or_default("FT_DATABASE_URL", DEFAULT_DATABASE_URL);
        if !database_url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid {
                key: "FT_DATABASE_URL",
                reason: format!("expected a sqlite: URL, got '{}'", database_url),
            });
        }

        Ok(Config {
            llm_provider: or_default("FT_LLM_PROVIDER", DEFAULT_PROVIDER),
            llm_name: or_default("FT_LLM_MODEL", DEFAULT_MODEL),
            api_key,
            llm_base_url: or_default("FT_LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            database_url,
            bind_addr,
            api_base_url: or_default("FT_API_BASE_URL", DEFAULT_API_BASE_URL),
            prompts_dir: or_default("FT_PROMPTS_DIR", DEFAULT_PROMPTS_DIR),
            log_level: or_default("FT_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        })
    }
}
