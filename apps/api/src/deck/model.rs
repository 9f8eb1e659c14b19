use std::path::Path;

use crate::deck::color::Rgb;
use crate::deck::RenderError;
use crate::pptx;

/// 13.33" × 7.5" widescreen, in EMUs (914400 per inch).
pub const SLIDE_WIDTH_EMU: i64 = 12_188_952;
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Title,
    BulletedContent,
    CategorizedSkills,
    Contact,
}

impl LayoutKind {
    /// Only the title slide uses the centered title layout; the rest share title-and-content.
    pub fn is_title_layout(&self) -> bool {
        matches!(self, LayoutKind::Title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One run of text with its formatting. Empty text renders as a spacer line.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub level: u8,
    pub size_pt: u32,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub bullet: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, size_pt: u32, color: Rgb) -> Self {
        Self {
            text: text.into(),
            level: 0,
            size_pt,
            color,
            bold: false,
            italic: false,
            align: Align::Left,
            bullet: false,
        }
    }

    pub fn spacer(size_pt: u32, color: Rgb) -> Self {
        Self::new(String::new(), size_pt, color)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn bulleted(mut self) -> Self {
        self.bullet = true;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub layout: LayoutKind,
    pub title: Paragraph,
    pub body: Vec<Paragraph>,
    pub background: Rgb,
}

impl Slide {
    pub fn new(layout: LayoutKind, title: Paragraph, background: Rgb) -> Self {
        Self {
            layout,
            title,
            body: Vec::new(),
            background,
        }
    }

    pub fn title_text(&self) -> &str {
        &self.title.text
    }

    /// Drops any existing body text so the slide can be re-filled.
    pub fn clear_body(&mut self) {
        self.body.clear();
    }

    pub fn push(&mut self, paragraph: Paragraph) -> &mut Self {
        self.body.push(paragraph);
        self
    }

    pub fn body_text(&self) -> Vec<&str> {
        self.body.iter().map(|p| p.text.as_str()).collect()
    }
}

/// An ordered slide sequence plus page size. Serialized once, then dropped.
#[derive(Debug, Clone)]
pub struct Deck {
    pub(crate) slides: Vec<Slide>,
    width_emu: i64,
    height_emu: i64,
}

impl Deck {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            width_emu: SLIDE_WIDTH_EMU,
            height_emu: SLIDE_HEIGHT_EMU,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn width_emu(&self) -> i64 {
        self.width_emu
    }

    pub fn height_emu(&self) -> i64 {
        self.height_emu
    }

    pub fn titles(&self) -> Vec<&str> {
        self.slides.iter().map(Slide::title_text).collect()
    }

    /// Appends a slide and returns it for further editing.
    pub fn add_slide(&mut self, slide: Slide) -> &mut Slide {
        self.slides.push(slide);
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Serializes the deck as an in-memory .pptx package.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let cursor = pptx::write_package(self, std::io::Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Writes the .pptx package to `path`.
    #[allow(dead_code)]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let file = std::fs::File::create(path)?;
        pptx::write_package(self, file)?;
        Ok(())
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::color::PROFESSIONAL;

    #[test]
    fn test_new_deck_is_widescreen() {
        let deck = Deck::new();
        assert_eq!(deck.slide_count(), 0);
        assert_eq!(deck.width_emu(), 12_188_952);
        assert_eq!(deck.height_emu(), 6_858_000);
    }

    #[test]
    fn test_add_slide_returns_new_slide() {
        let mut deck = Deck::new();
        let slide = deck.add_slide(Slide::new(
            LayoutKind::BulletedContent,
            Paragraph::new("About Me", 40, PROFESSIONAL.primary),
            PROFESSIONAL.secondary,
        ));
        slide.push(Paragraph::new("Point", 24, PROFESSIONAL.text));
        assert_eq!(deck.titles(), vec!["About Me"]);
        assert_eq!(deck.slides()[0].body_text(), vec!["Point"]);
    }

    #[test]
    fn test_paragraph_builders() {
        let p = Paragraph::new("x", 20, PROFESSIONAL.text)
            .bold()
            .italic()
            .centered()
            .bulleted()
            .level(1);
        assert!(p.bold && p.italic && p.bullet);
        assert_eq!(p.align, Align::Center);
        assert_eq!(p.level, 1);
        assert!(Paragraph::spacer(20, PROFESSIONAL.text).is_empty());
    }
}
