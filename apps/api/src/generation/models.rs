//! Input and output records for content generation.
//!
//! `ResumeInput` is what the user submits. `GeneratedContent` is the typed
//! schema the AI reply must decode into; decoding fails fast with a message
//! naming the offending field instead of failing later inside the renderer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;
use crate::llm_client::GenerationError;

// ────────────────────────────────────────────────────────────────────────────
// User input
// ────────────────────────────────────────────────────────────────────────────

/// Free-text resume fields as collected from the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeInput {
    pub name: String,
    pub title: String,
    pub contact: ContactInput,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub achievements: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub portfolio: String,
}

impl ResumeInput {
    /// Name and title are the only required fields; everything else may be blank.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.title.trim().is_empty() {
            return Err(AppError::Validation(
                "Name and Professional Title are required".to_string(),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated content schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title_slide: TitleSlide,
    #[serde(default, deserialize_with = "nullable")]
    pub about_me: AboutMe,
    #[serde(default, deserialize_with = "nullable")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "nullable")]
    pub skills: Skills,
    #[serde(default, deserialize_with = "nullable")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSlide {
    pub name: String,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AboutMe {
    #[serde(default, deserialize_with = "nullable")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(alias = "role")]
    pub title: String,
    pub company: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gpa: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, deserialize_with = "nullable")]
    pub technical: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub soft: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub domain: Vec<String>,
}

/// Skill groups in the order they appear on the skills slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Technical,
    Soft,
    Domain,
}

impl SkillCategory {
    pub const ORDER: [SkillCategory; 3] = [
        SkillCategory::Technical,
        SkillCategory::Soft,
        SkillCategory::Domain,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "Technical Skills:",
            SkillCategory::Soft => "Soft Skills:",
            SkillCategory::Domain => "Domain Skills:",
        }
    }
}

impl Skills {
    pub fn category(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Technical => &self.technical,
            SkillCategory::Soft => &self.soft,
            SkillCategory::Domain => &self.domain,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub portfolio: Option<String>,
}

impl GeneratedContent {
    /// Checks the fields the title slide cannot do without.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.title_slide.name.trim().is_empty() {
            return Err(GenerationError::InvalidContent(
                "title_slide.name is empty".to_string(),
            ));
        }
        if self.title_slide.title.trim().is_empty() {
            return Err(GenerationError::InvalidContent(
                "title_slide.title is empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoders
// ────────────────────────────────────────────────────────────────────────────

/// Treats an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings or numbers (models often emit `"year": 2020` or `"gpa": 3.8`).
/// Blank strings become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        match Option::<TextOrNumber>::deserialize(deserializer)? {
            Some(TextOrNumber::Text(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(TextOrNumber::Number(n)) => Some(n.to_string()),
            None => None,
        },
    )
}
