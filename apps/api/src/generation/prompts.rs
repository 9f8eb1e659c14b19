// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::with_json_only_instruction;
use crate::llm_client::Backend;

/// System prompt for the OpenAI-style backend (JSON mode is requested on the wire).
pub const OPENAI_SYSTEM: &str = "You are an expert resume writer creating PowerPoint content.";

/// System prompt for the Perplexity-style backend, which has no JSON mode.
pub const PERPLEXITY_SYSTEM: &str = "You are an expert resume writer. Return ONLY valid JSON.";

/// Resume presentation prompt template. Replace `{resume_json}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Generate a professional resume presentation with the following information:

{resume_json}

Create structured JSON with these REQUIRED fields:
{
  "title_slide": {
    "name": "FULL_NAME (REQUIRED)",
    "title": "PROFESSIONAL_TITLE (REQUIRED)",
    "tagline": "Optional tagline"
  },
  "about_me": {
    "points": ["Bullet point 1", "Bullet point 2"]
  },
  "work_experience": [
    {
      "title": "Job Title",
      "company": "Company Name",
      "dates": "Employment Dates",
      "responsibilities": ["Responsibility 1", "Responsibility 2"]
    }
  ],
  "education": [
    {
      "degree": "Degree Name",
      "institution": "Institution Name",
      "year": "Graduation Year",
      "gpa": "Optional GPA",
      "achievements": ["Achievement 1"]
    }
  ],
  "skills": {
    "technical": ["Skill 1"],
    "soft": ["Skill 2"],
    "domain": ["Skill 3"]
  },
  "achievements": ["Achievement 1"],
  "contact": {
    "email": "user@example.com",
    "phone": "+1234567890",
    "linkedin": "linkedin.com/in/username",
    "portfolio": "portfolio.com"
  }
}"#;

pub fn system_prompt(backend: Backend) -> &'static str {
    match backend {
        Backend::OpenAi => OPENAI_SYSTEM,
        Backend::Perplexity => PERPLEXITY_SYSTEM,
    }
}

/// Adds the JSON-only trailer for backends that cannot enforce JSON output.
pub fn finalize_prompt(backend: Backend, prompt: String) -> String {
    match backend {
        Backend::OpenAi => prompt,
        Backend::Perplexity => with_json_only_instruction(&prompt),
    }
}
