//! Axum route handlers for the Generation API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::deck::template::template_structure;
use crate::deck::DeckBuilder;
use crate::errors::AppError;
use crate::generation::generator::generate_content;
use crate::generation::models::{GeneratedContent, ResumeInput};
use crate::llm_client::Backend;
use crate::pptx::{DOWNLOAD_FILENAME, PPTX_MIME};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub resume: ResumeInput,
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub resume: ResumeInput,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub backend: Option<String>,
    /// Overrides the template's scheme. Unknown names keep the template's palette.
    #[serde(default)]
    pub color_scheme: Option<String>,
}

/// Parses the requested backend or falls back to the configured default.
fn resolve_backend(state: &AppState, requested: Option<&str>) -> Result<Backend, AppError> {
    Ok(requested
        .map(str::parse::<Backend>)
        .transpose()?
        .unwrap_or(state.default_backend))
}

/// Wraps pptx bytes as a download.
pub(crate) fn pptx_response(bytes: Vec<u8>, request_id: Uuid) -> Response {
    (
        [
            (header::CONTENT_TYPE, PPTX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
            (
                header::HeaderName::from_static("x-request-id"),
                request_id.to_string(),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/content
///
/// Generates slide content without rendering it. Useful for previewing or
/// editing content before calling `/api/v1/decks/render`.
pub async fn handle_generate_content(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<GeneratedContent>, AppError> {
    request.resume.validate()?;
    let backend = resolve_backend(&state, request.backend.as_deref())?;

    let content = generate_content(&state.llm, backend, &request.resume).await?;
    Ok(Json(content))
}

/// POST /api/v1/decks
///
/// Full pipeline: validate → generate → render → pptx download.
pub async fn handle_create_deck(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    request.resume.validate()?;
    let backend = resolve_backend(&state, request.backend.as_deref())?;

    // Template scheme first; an explicit override only replaces it when the name is known.
    let template = template_structure(request.template.as_deref().unwrap_or_default());
    let mut builder = DeckBuilder::new();
    builder.set_color_scheme(template.color_scheme);
    if let Some(name) = request.color_scheme.as_deref() {
        builder.set_color_scheme(name);
    }

    info!(
        "[{request_id}] Creating deck for '{}' via {backend} (template: {}, scheme: {})",
        request.resume.name,
        template.key,
        builder.color_scheme().name
    );

    let content = generate_content(&state.llm, backend, &request.resume).await?;
    let deck = builder.render(&content)?;
    let bytes = deck.to_bytes()?;

    info!(
        "[{request_id}] Deck ready: {} slides, {} bytes",
        deck.slide_count(),
        bytes.len()
    );

    Ok(pptx_response(bytes, request_id))
}
