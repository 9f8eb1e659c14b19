//! LLM Client: the single point of entry for all completion API calls.
//!
//! Two interchangeable backends speak the same chat-completions dialect
//! (OpenAI-style and Perplexity-style). Handlers pick one per request via
//! [`Backend`]; nothing else in the crate talks HTTP to an AI provider.
//!
//! No retries: a failed call is returned to the caller as a `GenerationError`.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod prompts;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4";
pub const PERPLEXITY_MODEL: &str = "sonar-pro";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Generated content is invalid: {0}")]
    InvalidContent(String),

    #[error("Required environment variable '{0}' is not set")]
    MissingCredential(&'static str),

    #[error("Unsupported AI backend: {0}")]
    UnknownBackend(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Backend selection
// ────────────────────────────────────────────────────────────────────────────

/// Which completion service handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    OpenAi,
    Perplexity,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::OpenAi => "openai",
            Backend::Perplexity => "perplexity",
        }
    }

    /// Environment variable holding this backend's bearer credential.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Backend::OpenAi => "OPENAI_API_KEY",
            Backend::Perplexity => "PERPLEXITY_API_KEY",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = GenerationError;

    /// Accepts the API spellings as well as the display labels ("OpenAI", "Perplexity AI").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open-ai" => Ok(Backend::OpenAi),
            "perplexity" | "perplexity ai" | "perplexity-ai" => Ok(Backend::Perplexity),
            _ => Err(GenerationError::UnknownBackend(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait
// ────────────────────────────────────────────────────────────────────────────

/// A chat-completion service. Implement this to swap transports without
/// touching the generator or handlers.
///
/// Carried in `LlmClient` as `Arc<dyn ChatBackend>`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one system + user exchange and returns the raw reply text.
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, GenerationError>;
}

/// Chat-completions over HTTPS with a bearer credential.
pub struct HttpChatBackend {
    backend: Backend,
    client: Client,
    endpoint: String,
    model: &'static str,
    api_key: Option<String>,
    json_mode: bool,
}

impl HttpChatBackend {
    pub fn openai(client: Client, api_key: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            backend: Backend::OpenAi,
            client,
            endpoint: endpoint.unwrap_or_else(|| OPENAI_API_URL.to_string()),
            model: OPENAI_MODEL,
            api_key,
            json_mode: true,
        }
    }

    pub fn perplexity(client: Client, api_key: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            backend: Backend::Perplexity,
            client,
            endpoint: endpoint.unwrap_or_else(|| PERPLEXITY_API_URL.to_string()),
            model: PERPLEXITY_MODEL,
            api_key,
            json_mode: false,
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential(self.backend.credential_var()))?;

        let request_body = ChatRequest {
            model: self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: self.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} API returned {}: {}", self.backend, status, body);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "{} call succeeded: prompt_tokens={}, completion_tokens={}",
                self.backend, usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat_response
            .text()
            .map(str::to_string)
            .ok_or(GenerationError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client shared by all handlers. Holds one implementation per backend.
#[derive(Clone)]
pub struct LlmClient {
    openai: Arc<dyn ChatBackend>,
    perplexity: Arc<dyn ChatBackend>,
}

impl LlmClient {
    /// Builds both HTTP backends over one shared connection pool.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_backends(
            Arc::new(HttpChatBackend::openai(
                client.clone(),
                config.openai_api_key.clone(),
                config.openai_api_url.clone(),
            )),
            Arc::new(HttpChatBackend::perplexity(
                client,
                config.perplexity_api_key.clone(),
                config.perplexity_api_url.clone(),
            )),
        ))
    }

    pub fn with_backends(openai: Arc<dyn ChatBackend>, perplexity: Arc<dyn ChatBackend>) -> Self {
        Self { openai, perplexity }
    }

    fn backend(&self, backend: Backend) -> &dyn ChatBackend {
        match backend {
            Backend::OpenAi => self.openai.as_ref(),
            Backend::Perplexity => self.perplexity.as_ref(),
        }
    }

    /// Makes a raw call and returns the reply text untouched.
    pub async fn call(
        &self,
        backend: Backend,
        prompt: &str,
        system: &str,
    ) -> Result<String, GenerationError> {
        info!("Calling {} completion backend", backend);
        self.backend(backend).complete(prompt, system).await
    }

    /// Calls the backend and deserializes the reply as JSON.
    /// Formatting markers around the payload are stripped first.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        backend: Backend,
        prompt: &str,
        system: &str,
    ) -> Result<T, GenerationError> {
        let text = self.call(backend, prompt, system).await?;
        parse_json_reply(&text)
    }
}

/// Parses a reply that should contain one JSON value, tolerating wrappers.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let payload = extract_json_payload(text);
    if payload.len() != text.trim().len() {
        debug!(
            "Stripped {} bytes of formatting around JSON reply",
            text.trim().len().saturating_sub(payload.len())
        );
    }
    serde_json::from_str(&payload).map_err(GenerationError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest)
        .trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

/// Removes fence wrappers, stray fence runs, and prose around a JSON object.
fn extract_json_payload(text: &str) -> String {
    let stripped = strip_json_fences(text);
    let cleaned = stripped.replace("```", "");
    let cleaned = cleaned.trim();

    if cleaned.starts_with('{') || cleaned.starts_with('[') {
        return cleaned.to_string();
    }

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}
