//! Content Generation: turns user input into typed presentation content.
//!
//! Flow: build prompt → backend call → strip wrappers → schema decode →
//!       content validation. Required input fields are checked by the
//!       handlers before this runs.
//!
//! Every failure comes back as a `GenerationError` value; the caller decides
//! how to surface it. Nothing here retries.

use tracing::{info, warn};

use crate::generation::models::{GeneratedContent, ResumeInput};
use crate::generation::prompts::{finalize_prompt, system_prompt, RESUME_PROMPT_TEMPLATE};
use crate::llm_client::{Backend, GenerationError, LlmClient};

/// Asks the selected backend for presentation content and decodes it.
pub async fn generate_content(
    llm: &LlmClient,
    backend: Backend,
    input: &ResumeInput,
) -> Result<GeneratedContent, GenerationError> {
    let prompt = finalize_prompt(backend, build_resume_prompt(input)?);

    let content: GeneratedContent = llm
        .call_json(backend, &prompt, system_prompt(backend))
        .await
        .inspect_err(|e| warn!("Content generation via {} failed: {e}", backend))?;

    content.validate()?;

    info!(
        "Generated content: {} experience entries, {} education entries, {} achievements",
        content.work_experience.len(),
        content.education.len(),
        content.achievements.len()
    );

    Ok(content)
}

/// Builds the instruction by embedding the input as pretty-printed JSON.
fn build_resume_prompt(input: &ResumeInput) -> Result<String, GenerationError> {
    let resume_json = serde_json::to_string_pretty(input)?;
    Ok(RESUME_PROMPT_TEMPLATE.replace("{resume_json}", &resume_json))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::ChatBackend;

    /// Backend that returns a canned reply and records what it was sent.
    pub(crate) struct StubBackend {
        reply: Result<String, String>,
        pub(crate) seen: Mutex<Vec<(String, String)>>,
    }

    impl StubBackend {
        pub(crate) fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn complete(&self, prompt: &str, system: &str) -> Result<String, GenerationError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            self.reply.clone().map_err(|message| GenerationError::Api {
                status: 500,
                message,
            })
        }
    }

    pub(crate) const VALID_REPLY: &str = r#"{
        "title_slide": {"name": "Jane Doe", "title": "Data Scientist", "tagline": "Turning data into decisions"},
        "about_me": {"points": ["8 years in analytics", "Team lead"]},
        "work_experience": [
            {"title": "Senior Data Scientist", "company": "Acme", "dates": "2020-2024",
             "responsibilities": ["Built churn model", "Mentored 4 analysts"]}
        ],
        "education": [
            {"degree": "MSc Statistics", "institution": "MIT", "year": "2016", "gpa": "3.9",
             "achievements": ["Dean's list"]}
        ],
        "skills": {"technical": ["Python", "SQL"], "soft": ["Communication"], "domain": []},
        "achievements": [],
        "contact": {"email": "jane@example.com", "phone": "+1 555 0100"}
    }"#;

    fn jane() -> ResumeInput {
        ResumeInput {
            name: "Jane Doe".to_string(),
            title: "Data Scientist".to_string(),
            summary: "Analytics lead".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_embeds_input_as_json() {
        let prompt = build_resume_prompt(&jane()).unwrap();
        assert!(prompt.contains("\"name\": \"Jane Doe\""));
        assert!(prompt.contains("\"title_slide\""));
        assert!(!prompt.contains("{resume_json}"));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_parsed() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        let stub = StubBackend::replying(&fenced);
        let llm = LlmClient::with_backends(stub.clone(), StubBackend::failing("unused"));

        let content = generate_content(&llm, Backend::OpenAi, &jane()).await.unwrap();
        assert_eq!(content.title_slide.name, "Jane Doe");
        assert_eq!(content.work_experience.len(), 1);
        assert!(content.achievements.is_empty());

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen[0].1, crate::generation::prompts::OPENAI_SYSTEM);
    }

    #[tokio::test]
    async fn test_perplexity_prompt_gets_json_trailer() {
        let stub = StubBackend::replying(VALID_REPLY);
        let llm = LlmClient::with_backends(StubBackend::failing("unused"), stub.clone());

        generate_content(&llm, Backend::Perplexity, &jane()).await.unwrap();

        let seen = stub.seen.lock().unwrap();
        assert!(seen[0].0.ends_with("Return response as valid JSON only."));
        assert_eq!(seen[0].1, crate::generation::prompts::PERPLEXITY_SYSTEM);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_generation_error() {
        let stub = StubBackend::replying("I'm sorry, I can't produce that right now.");
        let llm = LlmClient::with_backends(stub, StubBackend::failing("unused"));

        let err = generate_content(&llm, Backend::OpenAi, &jane()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_generation_error() {
        let stub = StubBackend::replying(r#"{"slides": []}"#);
        let llm = LlmClient::with_backends(stub, StubBackend::failing("unused"));

        let err = generate_content(&llm, Backend::OpenAi, &jane()).await.unwrap_err();
        assert!(err.to_string().contains("title_slide"));
    }

    #[tokio::test]
    async fn test_blank_generated_title_is_rejected() {
        let stub = StubBackend::replying(r#"{"title_slide": {"name": "Jane", "title": ""}}"#);
        let llm = LlmClient::with_backends(stub, StubBackend::failing("unused"));

        let err = generate_content(&llm, Backend::OpenAi, &jane()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidContent(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_is_returned_as_value() {
        let llm = LlmClient::with_backends(
            StubBackend::failing("upstream exploded"),
            StubBackend::failing("unused"),
        );

        let err = generate_content(&llm, Backend::OpenAi, &jane()).await.unwrap_err();
        assert!(err.to_string().contains("upstream exploded"));
    }
}
