pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::deck::handlers as deck_handlers;
use crate::errors::AppError;
use crate::generation::handlers as generation_handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalog
        .route("/api/v1/templates", get(deck_handlers::handle_list_templates))
        .route(
            "/api/v1/templates/:name",
            get(deck_handlers::handle_get_template),
        )
        // Generation
        .route(
            "/api/v1/content",
            post(generation_handlers::handle_generate_content),
        )
        .route("/api/v1/decks", post(generation_handlers::handle_create_deck))
        .route(
            "/api/v1/decks/render",
            post(deck_handlers::handle_render_deck),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::generator::tests::{StubBackend, VALID_REPLY};
    use crate::llm_client::{Backend, ChatBackend, LlmClient};
    use crate::pptx::{read_package, PPTX_MIME};

    fn app(openai: Arc<dyn ChatBackend>, perplexity: Arc<dyn ChatBackend>) -> Router {
        build_router(AppState {
            llm: LlmClient::with_backends(openai, perplexity),
            default_backend: Backend::OpenAi,
        })
    }

    fn stub_app() -> Router {
        app(
            StubBackend::replying(VALID_REPLY),
            StubBackend::failing("perplexity not configured"),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn resume() -> Value {
        json!({"name": "Jane Doe", "title": "Data Scientist", "summary": "Analytics lead"})
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    /// Background color written into the first slide of a returned deck.
    async fn title_background(response: axum::response::Response) -> String {
        use std::io::{Cursor, Read};

        let bytes = body_bytes(response).await;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        let bg = &xml[xml.find("<p:bg>").unwrap()..];
        let val = &bg[bg.find("srgbClr val=\"").unwrap() + 13..];
        val[..6].to_string()
    }

    async fn deck_background(body: Value) -> String {
        let response = stub_app()
            .oneshot(post_json("/api/v1/decks", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        title_background(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let response = stub_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = stub_app()
            .oneshot(Request::get("/api/v1/slides").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_templates() {
        let response = stub_app()
            .oneshot(Request::get("/api/v1/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        let keys: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["professional", "modern", "creative", "executive", "academic"]);
    }

    #[tokio::test]
    async fn test_unknown_template_falls_back_to_professional() {
        let response = stub_app()
            .oneshot(
                Request::get("/api/v1/templates/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["key"], "professional");
    }

    #[tokio::test]
    async fn test_generate_content_returns_json() {
        let response = stub_app()
            .oneshot(post_json("/api/v1/content", json!({"resume": resume()})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title_slide"]["name"], "Jane Doe");
        assert_eq!(body["work_experience"][0]["company"], "Acme");
    }

    #[tokio::test]
    async fn test_create_deck_returns_pptx() {
        let response = stub_app()
            .oneshot(post_json(
                "/api/v1/decks",
                json!({"resume": resume(), "template": "creative"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PPTX_MIME);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_presentation.pptx\""
        );

        let slides = read_package(&body_bytes(response).await).unwrap();
        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Jane Doe",
                "About Me",
                "Experience: Senior Data Scientist at Acme",
                "Education",
                "Skills & Expertise",
                "Contact Information",
            ]
        );
        assert_eq!(slides[2].body()[0], "2020-2024");
    }

    #[tokio::test]
    async fn test_deck_uses_template_color_scheme() {
        let bg = deck_background(json!({"resume": resume(), "template": "creative"})).await;
        assert_eq!(bg, "FAFAFA");

        let bg = deck_background(json!({"resume": resume()})).await;
        assert_eq!(bg, "E1E1E1");
    }

    #[tokio::test]
    async fn test_explicit_color_scheme_overrides_template() {
        let bg = deck_background(json!({
            "resume": resume(), "template": "creative", "color_scheme": "modern"
        }))
        .await;
        assert_eq!(bg, "ECF0F1");
    }

    #[tokio::test]
    async fn test_unknown_color_scheme_keeps_template_scheme() {
        let bg = deck_background(json!({
            "resume": resume(), "template": "creative", "color_scheme": "neon"
        }))
        .await;
        assert_eq!(bg, "FAFAFA");
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected_before_generation() {
        let stub = StubBackend::replying(VALID_REPLY);
        let response = app(stub.clone(), StubBackend::failing("unused"))
            .oneshot(post_json(
                "/api/v1/decks",
                json!({"resume": {"name": "", "title": "Engineer"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Name and Professional Title are required"
        );
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_bad_request() {
        let response = stub_app()
            .oneshot(post_json(
                "/api/v1/decks",
                json!({"resume": resume(), "backend": "gemini"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "UNKNOWN_BACKEND");
    }

    #[tokio::test]
    async fn test_backend_label_selects_perplexity() {
        let perplexity = StubBackend::replying(VALID_REPLY);
        let response = app(StubBackend::failing("unused"), perplexity.clone())
            .oneshot(post_json(
                "/api/v1/content",
                json!({"resume": resume(), "backend": "Perplexity AI"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(perplexity.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_is_bad_gateway() {
        let response = app(
            StubBackend::failing("rate limited"),
            StubBackend::failing("unused"),
        )
        .oneshot(post_json("/api/v1/decks", json!({"resume": resume()})))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let message = body_json(response).await["error"]["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.starts_with("Error generating content:"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_render_without_backend() {
        let content: Value = serde_json::from_str(VALID_REPLY).unwrap();
        let openai = StubBackend::failing("must not be called");
        let response = app(openai.clone(), StubBackend::failing("unused"))
            .oneshot(post_json(
                "/api/v1/decks/render",
                json!({"content": content, "color_scheme": "modern"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(openai.seen.lock().unwrap().is_empty());

        let slides = read_package(&body_bytes(response).await).unwrap();
        assert_eq!(slides.len(), 6);
        assert_eq!(slides.last().unwrap().body()[0], "Email: jane@example.com");
    }

    #[tokio::test]
    async fn test_render_rejects_blank_title() {
        let response = stub_app()
            .oneshot(post_json(
                "/api/v1/decks/render",
                json!({"content": {"title_slide": {"name": "Jane", "title": " "}}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
