//! Axum route handlers for templates and content-only rendering.

use axum::{extract::Path, response::Response, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::deck::color::PROFESSIONAL;
use crate::deck::render_deck;
use crate::deck::template::{template_structure, Template, TEMPLATES};
use crate::errors::AppError;
use crate::generation::handlers::pptx_response;
use crate::generation::models::GeneratedContent;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub content: GeneratedContent,
    #[serde(default)]
    pub color_scheme: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<&'static [Template]> {
    Json(&TEMPLATES[..])
}

/// GET /api/v1/templates/:name
///
/// Unknown names resolve to the professional template.
pub async fn handle_get_template(Path(name): Path<String>) -> Json<&'static Template> {
    Json(template_structure(&name))
}

/// POST /api/v1/decks/render
///
/// Renders already-generated content; no AI backend is called.
pub async fn handle_render_deck(Json(request): Json<RenderRequest>) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    request.content.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let scheme = request.color_scheme.as_deref().unwrap_or(PROFESSIONAL.name);
    let deck = render_deck(&request.content, scheme)?;
    let bytes = deck.to_bytes()?;

    info!(
        "[{request_id}] Rendered '{}' deck: {} slides",
        request.content.title_slide.name,
        deck.slide_count()
    );

    Ok(pptx_response(bytes, request_id))
}
