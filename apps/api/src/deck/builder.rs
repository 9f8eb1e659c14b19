//! Deck Renderer: walks generated content and emits slides in a fixed order.
//!
//! Order: title → About Me → one slide per job → Education → Skills →
//!        Achievements (only when non-empty) → Contact Information.
//!
//! A template's declared slide order is not consulted here.

use tracing::{debug, warn};

use crate::deck::color::ColorScheme;
use crate::deck::model::{Deck, LayoutKind, Paragraph, Slide};
use crate::deck::RenderError;
use crate::generation::models::{
    Contact, Education, GeneratedContent, SkillCategory, Skills, WorkExperience,
};

const NAME_PT: u32 = 54;
const SUBTITLE_PT: u32 = 32;
const TAGLINE_PT: u32 = 24;
const SLIDE_TITLE_PT: u32 = 40;
const BULLET_PT: u32 = 24;
const SUB_BULLET_PT: u32 = 20;

const MISSING: &str = "N/A";

/// Owns the deck under construction for one request.
pub struct DeckBuilder {
    deck: Deck,
    scheme: ColorScheme,
}

impl DeckBuilder {
    /// Starts an empty deck with the professional scheme active.
    pub fn new() -> Self {
        Self {
            deck: Deck::new(),
            scheme: ColorScheme::default(),
        }
    }

    /// Switches palettes for slides added afterwards. Unknown names are ignored
    /// and the current scheme stays active; returns whether the switch happened.
    pub fn set_color_scheme(&mut self, name: &str) -> bool {
        match ColorScheme::named(name) {
            Some(scheme) => {
                self.scheme = scheme;
                true
            }
            None => {
                warn!(
                    "Unknown color scheme '{}', keeping '{}'",
                    name, self.scheme.name
                );
                false
            }
        }
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    fn new_slide(&mut self, layout: LayoutKind, title: &str) -> &mut Slide {
        let scheme = self.scheme;
        let title = Paragraph::new(title, SLIDE_TITLE_PT, scheme.primary).bold();
        self.deck
            .add_slide(Slide::new(layout, title, scheme.secondary))
    }

    /// Name large and centered, professional title beneath, tagline third when present.
    pub fn add_title_slide(&mut self, name: &str, title: &str, tagline: Option<&str>) -> &mut Slide {
        let scheme = self.scheme;
        let heading = Paragraph::new(name, NAME_PT, scheme.primary)
            .bold()
            .centered();
        let slide = self
            .deck
            .add_slide(Slide::new(LayoutKind::Title, heading, scheme.secondary));

        slide.push(Paragraph::new(title, SUBTITLE_PT, scheme.text).centered());

        if let Some(tagline) = tagline.filter(|t| !t.trim().is_empty()) {
            slide
                .push(Paragraph::spacer(SUBTITLE_PT, scheme.text).centered())
                .push(
                    Paragraph::new(tagline, TAGLINE_PT, scheme.accent)
                        .italic()
                        .centered(),
                );
        }

        slide
    }

    /// A titled slide with one bullet per string.
    pub fn add_content_slide(&mut self, title: &str, bullets: &[String]) -> &mut Slide {
        let scheme = self.scheme;
        let slide = self.new_slide(LayoutKind::BulletedContent, title);
        set_bullets(slide, bullets, &scheme);
        slide
    }

    /// One slide per job: dates first, then responsibilities.
    pub fn add_experience_slides(&mut self, experiences: &[WorkExperience]) {
        for exp in experiences {
            let title = format!("Experience: {} at {}", exp.title, exp.company);
            let mut bullets = Vec::with_capacity(exp.responsibilities.len() + 1);
            bullets.push(exp.dates.clone().unwrap_or_else(|| MISSING.to_string()));
            bullets.extend(exp.responsibilities.iter().cloned());
            self.add_content_slide(&title, &bullets);
        }
    }

    /// All degrees on one slide, achievements indented under their degree.
    pub fn add_education_slide(&mut self, education: &[Education]) -> &mut Slide {
        let scheme = self.scheme;
        let slide = self.new_slide(LayoutKind::BulletedContent, "Education");

        for edu in education {
            slide.push(Paragraph::new(education_line(edu), BULLET_PT, scheme.text).bulleted());
            for achievement in &edu.achievements {
                slide.push(
                    Paragraph::new(achievement.as_str(), SUB_BULLET_PT, scheme.text)
                        .bulleted()
                        .level(1),
                );
            }
        }

        slide
    }

    /// Category headers in fixed order; empty categories are skipped entirely.
    pub fn add_skills_slide(&mut self, skills: &Skills) -> &mut Slide {
        let scheme = self.scheme;
        let slide = self.new_slide(LayoutKind::CategorizedSkills, "Skills & Expertise");

        for category in SkillCategory::ORDER {
            let items = skills.category(category);
            if items.is_empty() {
                continue;
            }

            slide.push(Paragraph::new(category.header(), BULLET_PT, scheme.accent).bold());
            for skill in items {
                slide.push(
                    Paragraph::new(skill.as_str(), SUB_BULLET_PT, scheme.text)
                        .bulleted()
                        .level(1),
                );
            }
            slide.push(Paragraph::spacer(SUB_BULLET_PT, scheme.text));
        }

        slide
    }

    /// Always four lines; blanks become "N/A".
    pub fn add_contact_slide(&mut self, contact: &Contact) -> &mut Slide {
        let scheme = self.scheme;
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());
        let lines = [
            format!("Email: {}", field(&contact.email)),
            format!("Phone: {}", field(&contact.phone)),
            format!("LinkedIn: {}", field(&contact.linkedin)),
            format!("Portfolio: {}", field(&contact.portfolio)),
        ];

        let slide = self.new_slide(LayoutKind::Contact, "Contact Information");
        set_bullets(slide, &lines, &scheme);
        slide
    }

    /// Renders every section in the fixed order and returns the finished deck.
    pub fn render(mut self, content: &GeneratedContent) -> Result<Deck, RenderError> {
        let title = &content.title_slide;
        if title.name.trim().is_empty() {
            return Err(RenderError::InvalidContent(
                "title slide requires a name".to_string(),
            ));
        }

        self.add_title_slide(&title.name, &title.title, title.tagline.as_deref());
        self.add_content_slide("About Me", &content.about_me.points);
        self.add_experience_slides(&content.work_experience);
        self.add_education_slide(&content.education);
        self.add_skills_slide(&content.skills);
        if !content.achievements.is_empty() {
            self.add_content_slide("Achievements & Certifications", &content.achievements);
        }
        self.add_contact_slide(&content.contact);

        debug!(
            "Rendered {} slides with '{}' scheme",
            self.deck.slide_count(),
            self.scheme.name
        );

        Ok(self.finish())
    }

    pub fn finish(self) -> Deck {
        self.deck
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a scheme by name (permissively) and renders the content.
pub fn render_deck(content: &GeneratedContent, scheme_name: &str) -> Result<Deck, RenderError> {
    let mut builder = DeckBuilder::new();
    builder.set_color_scheme(scheme_name);
    builder.render(content)
}

/// Replaces the slide body with one bullet per string.
fn set_bullets<S: AsRef<str>>(slide: &mut Slide, bullets: &[S], scheme: &ColorScheme) {
    slide.clear_body();
    for bullet in bullets {
        slide.push(Paragraph::new(bullet.as_ref(), BULLET_PT, scheme.text).bulleted());
    }
}

/// "{degree} - {institution}, {year} (GPA: x)" with the optional parts omitted when absent.
fn education_line(edu: &Education) -> String {
    let mut line = format!("{} - {}", edu.degree, edu.institution);
    if let Some(year) = &edu.year {
        line.push_str(", ");
        line.push_str(year);
    }
    if let Some(gpa) = &edu.gpa {
        line.push_str(&format!(" (GPA: {gpa})"));
    }
    line
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::color::{MODERN, PROFESSIONAL};
    use crate::deck::model::Align;
    use serde_json::json;

    fn content(value: serde_json::Value) -> GeneratedContent {
        serde_json::from_value(value).unwrap()
    }

    fn jane(achievements: serde_json::Value) -> GeneratedContent {
        content(json!({
            "title_slide": {"name": "Jane Doe", "title": "Data Scientist"},
            "about_me": {"points": ["Analytics lead"]},
            "work_experience": [
                {"title": "Data Scientist", "company": "Acme", "dates": "2020-2024",
                 "responsibilities": ["Built models"]},
                {"title": "Analyst", "company": "Initech", "responsibilities": []}
            ],
            "education": [{"degree": "BSc", "institution": "MIT", "year": "2016"}],
            "skills": {"technical": ["Python"]},
            "achievements": achievements,
            "contact": {"email": "jane@example.com"}
        }))
    }

    #[test]
    fn test_slide_count_matches_sections() {
        // title, about, education, skills, contact + 2 jobs
        let deck = render_deck(&jane(json!([])), "professional").unwrap();
        assert_eq!(deck.slide_count(), 5 + 2);

        let deck = render_deck(&jane(json!(["Kaggle Grandmaster"])), "professional").unwrap();
        assert_eq!(deck.slide_count(), 5 + 2 + 1);
    }

    #[test]
    fn test_empty_achievements_omit_slide_and_contact_is_last() {
        let deck = render_deck(&jane(json!([])), "professional").unwrap();
        let titles = deck.titles();
        assert!(!titles.iter().any(|t| t.contains("Achievements")));
        assert_eq!(*titles.last().unwrap(), "Contact Information");
    }

    #[test]
    fn test_fixed_assembly_order() {
        let deck = render_deck(&jane(json!(["Award"])), "modern").unwrap();
        assert_eq!(
            deck.titles(),
            vec![
                "Jane Doe",
                "About Me",
                "Experience: Data Scientist at Acme",
                "Experience: Analyst at Initech",
                "Education",
                "Skills & Expertise",
                "Achievements & Certifications",
                "Contact Information",
            ]
        );
    }

    #[test]
    fn test_experience_dates_first_and_missing_dates_na() {
        let deck = render_deck(&jane(json!([])), "professional").unwrap();
        assert_eq!(deck.slides()[2].body_text(), vec!["2020-2024", "Built models"]);
        assert_eq!(deck.slides()[3].body_text(), vec!["N/A"]);
    }

    #[test]
    fn test_title_slide_layout_and_optional_tagline() {
        let mut builder = DeckBuilder::new();
        builder.add_title_slide("Jane Doe", "Data Scientist", None);
        builder.add_title_slide("Jane Doe", "Data Scientist", Some("Data to decisions"));
        let deck = builder.finish();

        let plain = &deck.slides()[0];
        assert_eq!(plain.layout, LayoutKind::Title);
        assert_eq!(plain.title.size_pt, 54);
        assert_eq!(plain.title.align, Align::Center);
        assert!(plain.title.bold);
        assert_eq!(plain.body_text(), vec!["Data Scientist"]);

        let tagged = &deck.slides()[1];
        assert_eq!(tagged.body_text(), vec!["Data Scientist", "", "Data to decisions"]);
        let tagline = &tagged.body[2];
        assert!(tagline.italic);
        assert_eq!(tagline.color, PROFESSIONAL.accent);
        assert_eq!(tagline.size_pt, 24);
    }

    #[test]
    fn test_bullets_are_cleared_before_refill() {
        let mut builder = DeckBuilder::new();
        let scheme = *builder.color_scheme();
        let slide = builder.add_content_slide("About Me", &["one".to_string(), "two".to_string()]);
        set_bullets(slide, &["three"], &scheme);
        set_bullets(slide, &["three"], &scheme);
        assert_eq!(slide.body_text(), vec!["three"]);
    }

    #[test]
    fn test_education_aggregates_entries_with_sub_bullets() {
        let content = content(json!({
            "title_slide": {"name": "Jane", "title": "Analyst"},
            "education": [
                {"degree": "MSc Statistics", "institution": "MIT", "year": "2016", "gpa": "3.9",
                 "achievements": ["Dean's list", "Thesis prize"]},
                {"degree": "BSc Math", "institution": "UCLA", "year": 2014}
            ]
        }));
        let mut builder = DeckBuilder::new();
        let slide = builder.add_education_slide(&content.education);

        assert_eq!(
            slide.body_text(),
            vec![
                "MSc Statistics - MIT, 2016 (GPA: 3.9)",
                "Dean's list",
                "Thesis prize",
                "BSc Math - UCLA, 2014",
            ]
        );
        assert_eq!(slide.body[0].level, 0);
        assert_eq!(slide.body[1].level, 1);
        assert_eq!(slide.body[2].level, 1);
        assert_eq!(slide.body[3].level, 0);
    }

    #[test]
    fn test_skills_single_category() {
        let skills = Skills {
            technical: vec![],
            soft: vec!["X".to_string()],
            domain: vec![],
        };
        let mut builder = DeckBuilder::new();
        let slide = builder.add_skills_slide(&skills);

        assert_eq!(slide.layout, LayoutKind::CategorizedSkills);
        let headers: Vec<_> = slide.body.iter().filter(|p| p.bold).collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].text, "Soft Skills:");

        let sub_bullets: Vec<_> = slide.body.iter().filter(|p| p.level == 1).collect();
        assert_eq!(sub_bullets.len(), 1);
        assert_eq!(sub_bullets[0].text, "X");
        assert!(slide.body.last().unwrap().is_empty());
    }

    #[test]
    fn test_skills_category_order() {
        let skills = Skills {
            technical: vec!["Rust".to_string()],
            soft: vec![],
            domain: vec!["Fintech".to_string()],
        };
        let mut builder = DeckBuilder::new();
        let slide = builder.add_skills_slide(&skills);
        assert_eq!(
            slide.body_text(),
            vec!["Technical Skills:", "Rust", "", "Domain Skills:", "Fintech", ""]
        );
    }

    #[test]
    fn test_contact_substitutes_na() {
        let mut builder = DeckBuilder::new();
        let slide = builder.add_contact_slide(&Contact {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(
            slide.body_text(),
            vec![
                "Email: jane@example.com",
                "Phone: N/A",
                "LinkedIn: N/A",
                "Portfolio: N/A",
            ]
        );
    }

    #[test]
    fn test_unknown_scheme_keeps_previous_colors() {
        let mut builder = DeckBuilder::new();
        assert!(builder.set_color_scheme("modern"));
        assert!(!builder.set_color_scheme("neon"));
        let slide = builder.add_content_slide("About Me", &["x".to_string()]);

        assert_eq!(slide.background, MODERN.secondary);
        assert_eq!(slide.title.color, MODERN.primary);
        assert_eq!(slide.body[0].color, MODERN.text);
    }

    #[test]
    fn test_render_deck_with_unknown_scheme_uses_professional() {
        let deck = render_deck(&jane(json!([])), "neon").unwrap();
        assert!(deck
            .slides()
            .iter()
            .all(|s| s.background == PROFESSIONAL.secondary));
    }

    #[test]
    fn test_render_rejects_blank_name() {
        let content = content(json!({"title_slide": {"name": "", "title": "Analyst"}}));
        let err = DeckBuilder::new().render(&content).unwrap_err();
        assert!(matches!(err, RenderError::InvalidContent(_)));
    }
}
