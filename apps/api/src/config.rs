use anyhow::{Context, Result};

use crate::llm_client::Backend;

/// Application configuration loaded from environment variables.
///
/// Backend credentials are optional at startup: only the backend a request
/// selects needs its key, and a missing key surfaces as a generation error.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub openai_api_url: Option<String>,
    pub perplexity_api_url: Option<String>,
    pub default_backend: Backend,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            perplexity_api_key: optional_env("PERPLEXITY_API_KEY"),
            openai_api_url: optional_env("OPENAI_API_URL"),
            perplexity_api_url: optional_env("PERPLEXITY_API_URL"),
            default_backend: std::env::var("AI_BACKEND")
                .unwrap_or_else(|_| "openai".to_string())
                .parse::<Backend>()
                .context("AI_BACKEND must be 'openai' or 'perplexity'")?,
            request_timeout_secs: std::env::var("AI_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("AI_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an optional variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
