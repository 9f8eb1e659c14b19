use crate::llm_client::{Backend, LlmClient};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Backend used when a request does not name one (`AI_BACKEND`).
    pub default_backend: Backend,
}
