//! Reads slide text back out of a .pptx package.
//!
//! Only what the deck writer produces is understood: slide order comes from
//! presentation.xml, titles from title/ctrTitle placeholders, and everything
//! else is body text.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::deck::RenderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphText {
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideText {
    pub title: String,
    pub paragraphs: Vec<ParagraphText>,
}

impl SlideText {
    pub fn body(&self) -> Vec<&str> {
        self.paragraphs.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Parses every slide in presentation order.
pub fn read_package(bytes: &[u8]) -> Result<Vec<SlideText>, RenderError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let presentation = read_part(&mut archive, "ppt/presentation.xml")?;
    let rels = read_part(&mut archive, "ppt/_rels/presentation.xml.rels")?;

    let targets = relationship_targets(&rels)?;
    let mut slides = Vec::new();
    for rel_id in slide_rel_ids(&presentation)? {
        let target = targets
            .get(&rel_id)
            .ok_or_else(|| RenderError::Malformed(format!("no relationship for {rel_id}")))?;
        let xml = read_part(&mut archive, &format!("ppt/{target}"))?;
        slides.push(parse_slide(&xml)?);
    }
    Ok(slides)
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut file = archive.by_name(name)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

fn xml_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Malformed(e.to_string())
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

/// r:id values of `<p:sldId>` in document order.
fn slide_rel_ids(xml: &[u8]) -> Result<Vec<String>, RenderError> {
    let mut reader = Reader::from_reader(xml);
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldId" {
                    if let Some(rel) = rel_id_attr(&e) {
                        ids.push(rel);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

/// The `r:id` attribute, told apart from the plain `id` by its prefix.
fn rel_id_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            attr.key.local_name().as_ref() == b"id"
                && attr.key.prefix().is_some()
        })
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

fn relationship_targets(xml: &[u8]) -> Result<HashMap<String, String>, RenderError> {
    let mut reader = Reader::from_reader(xml);
    let mut targets = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    if let (Some(id), Some(target)) =
                        (attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                    {
                        targets.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Appends the character an entity or character reference stands for.
fn push_reference(out: &mut String, name: &str) {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse().ok(),
        };
        if let Some(ch) = code.and_then(char::from_u32) {
            out.push(ch);
        }
    } else if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(name) {
        out.push_str(resolved);
    }
}

fn parse_slide(xml: &[u8]) -> Result<SlideText, RenderError> {
    let mut reader = Reader::from_reader(xml);
    let mut slide = SlideText::default();
    let mut buf = Vec::new();

    let mut in_title_shape = false;
    let mut in_text = false;
    let mut para: Option<ParagraphText> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => in_title_shape = false,
                b"p" if e.name().prefix().map(|p| p.as_ref() == b"a").unwrap_or(false) => {
                    para = Some(ParagraphText {
                        text: String::new(),
                        level: 0,
                    });
                }
                b"pPr" => set_level(&e, para.as_mut()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"ph" => {
                    in_title_shape = matches!(
                        attr_value(&e, b"type").as_deref(),
                        Some("title") | Some("ctrTitle")
                    );
                }
                b"pPr" => set_level(&e, para.as_mut()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = std::str::from_utf8(t.as_ref()).map_err(xml_error)?;
                if let Some(p) = para.as_mut() {
                    p.text.push_str(text);
                }
            }
            Ok(Event::GeneralRef(r)) if in_text => {
                let name = std::str::from_utf8(&r).map_err(xml_error)?;
                if let Some(p) = para.as_mut() {
                    push_reference(&mut p.text, name);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if e.name().prefix().map(|p| p.as_ref() == b"a").unwrap_or(false) => {
                    if let Some(p) = para.take() {
                        if in_title_shape {
                            if slide.title.is_empty() {
                                slide.title = p.text;
                            }
                        } else {
                            slide.paragraphs.push(p);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(slide)
}

fn set_level(e: &quick_xml::events::BytesStart<'_>, para: Option<&mut ParagraphText>) {
    if let (Some(p), Some(level)) = (para, attr_value(e, b"lvl")) {
        p.level = level.parse().unwrap_or(0);
    }
}
