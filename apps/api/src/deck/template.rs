//! Template catalog: static presentation styles.
//!
//! Each template declares a slide order, but the renderer always emits its
//! fixed order; only `color_scheme` influences output today.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub slides: &'static [&'static str],
    pub color_scheme: &'static str,
}

pub static TEMPLATES: [Template; 5] = [
    Template {
        key: "professional",
        name: "Professional",
        description: "Clean and traditional template suitable for most industries",
        slides: &[
            "title_slide",
            "about_me",
            "work_experience",
            "education",
            "skills",
            "achievements",
            "contact",
        ],
        color_scheme: "professional",
    },
    Template {
        key: "modern",
        name: "Modern",
        description: "Contemporary design with a clean aesthetic",
        slides: &[
            "title_slide",
            "about_me",
            "skills",
            "work_experience",
            "education",
            "achievements",
            "contact",
        ],
        color_scheme: "modern",
    },
    Template {
        key: "creative",
        name: "Creative",
        description: "Bold and innovative design for creative fields",
        slides: &[
            "title_slide",
            "about_me",
            "skills",
            "portfolio_highlights",
            "work_experience",
            "education",
            "contact",
        ],
        color_scheme: "creative",
    },
    Template {
        key: "executive",
        name: "Executive",
        description: "Sophisticated design for senior professionals",
        slides: &[
            "title_slide",
            "executive_summary",
            "leadership_experience",
            "key_achievements",
            "education",
            "board_positions",
            "contact",
        ],
        color_scheme: "professional",
    },
    Template {
        key: "academic",
        name: "Academic",
        description: "Focused on education and research experience",
        slides: &[
            "title_slide",
            "research_interests",
            "education",
            "publications",
            "teaching_experience",
            "grants_awards",
            "contact",
        ],
        color_scheme: "professional",
    },
];

/// Template keys in catalog order.
pub fn template_options() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.key).collect()
}

/// Looks up a template, falling back to "professional" for unknown keys.
pub fn template_structure(key: &str) -> &'static Template {
    TEMPLATES
        .iter()
        .find(|t| t.key == key)
        .unwrap_or(&TEMPLATES[0])
}
