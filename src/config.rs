//! Configuration management for the LeanIX agent.
//!
//! Configuration is set via environment variables:
//! - `LX_API_TOKEN` - Required. LeanIX technical user API token (not base64).
//! - `LX_HOST` - Optional. LeanIX workspace host. Defaults to `eu-5.leanix.net`.
//! - `AGENT_API_KEY` - Required. API key for the agent platform.
//! - `AGENT_BASE_URL` - Optional. OpenAI-compatible base URL. Defaults to
//!   `https://openrouter.ai/api/v1`.
//! - `AGENT_MODEL` - Optional. Model identifier. Defaults to `openai/gpt-4o-mini`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `8`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// LeanIX workspace host (e.g. `eu-5.leanix.net`)
    pub lx_host: String,

    /// LeanIX technical user API token
    pub lx_api_token: String,

    /// Agent platform API key
    pub agent_api_key: String,

    /// Agent platform base URL (OpenAI-compatible)
    pub agent_base_url: String,

    /// Model identifier
    pub model: String,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `LX_API_TOKEN` or
    /// `AGENT_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lx_api_token = std::env::var("LX_API_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("LX_API_TOKEN".to_string()))?;

        let lx_host = std::env::var("LX_HOST")
            .unwrap_or_else(|_| "eu-5.leanix.net".to_string());

        let agent_api_key = std::env::var("AGENT_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("AGENT_API_KEY".to_string()))?;

        let agent_base_url = std::env::var("AGENT_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());

        let model = std::env::var("AGENT_MODEL")
            .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            lx_host,
            lx_api_token,
            agent_api_key,
            agent_base_url,
            model,
            max_iterations,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(lx_host: String, lx_api_token: String, agent_api_key: String) -> Self {
        Self {
            lx_host,
            lx_api_token,
            agent_api_key,
            agent_base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            max_iterations: 8,
        }
    }
}
