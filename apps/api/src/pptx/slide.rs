//! Slide part generation.

use std::fmt::Write as FmtWrite;

use crate::deck::model::{Align, Paragraph, Slide};
use crate::pptx::parts::{
    Frame, BODY_FRAME, CENTER_TITLE_FRAME, NS_ATTRS, SUBTITLE_FRAME, TITLE_FRAME, XML_DECL,
};

const BULLET_CHAR: &str = "\u{2022}";

/// Left margin and hanging indent per outline level, in EMUs.
fn indent_for(level: u8) -> (i64, i64) {
    match level {
        0 => (342_900, -342_900),
        1 => (742_950, -285_750),
        n => (742_950 + 400_050 * i64::from(n - 1), -228_600),
    }
}

/// Escapes text for an element body and drops characters XML 1.0 cannot carry.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn slide_xml(slide: &Slide) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(xml, "<p:sld {NS_ATTRS}>")?;
    xml.push_str("<p:cSld>");
    write!(
        xml,
        r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        slide.background.hex()
    )?;
    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    let (title_ph, title_frame, body_ph, body_frame, body_name) = if slide.layout.is_title_layout() {
        (
            r#"type="ctrTitle""#,
            CENTER_TITLE_FRAME,
            r#"type="subTitle" idx="1""#,
            SUBTITLE_FRAME,
            "Subtitle 2",
        )
    } else {
        (
            r#"type="title""#,
            TITLE_FRAME,
            r#"idx="1""#,
            BODY_FRAME,
            "Content Placeholder 2",
        )
    };

    write_shape(
        &mut xml,
        2,
        "Title 1",
        title_ph,
        title_frame,
        std::slice::from_ref(&slide.title),
    )?;
    if !slide.body.is_empty() {
        write_shape(&mut xml, 3, body_name, body_ph, body_frame, &slide.body)?;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

fn write_shape(
    xml: &mut String,
    id: u32,
    name: &str,
    ph_attrs: &str,
    frame: Frame,
    paragraphs: &[Paragraph],
) -> std::fmt::Result {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr>"#
    )?;
    write!(
        xml,
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )?;
    xml.push_str(r#"<p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);
    for paragraph in paragraphs {
        write_paragraph(xml, paragraph)?;
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_paragraph(xml: &mut String, p: &Paragraph) -> std::fmt::Result {
    let (mar_l, indent) = if p.bullet { indent_for(p.level) } else { (0, 0) };
    write!(
        xml,
        r#"<a:p><a:pPr marL="{mar_l}" lvl="{}" indent="{indent}""#,
        p.level
    )?;
    if p.align == Align::Center {
        xml.push_str(r#" algn="ctr""#);
    }
    xml.push('>');
    if p.bullet {
        write!(
            xml,
            r#"<a:buFont typeface="Arial"/><a:buChar char="{BULLET_CHAR}"/>"#
        )?;
    } else {
        xml.push_str("<a:buNone/>");
    }
    xml.push_str("</a:pPr>");

    let size = p.size_pt * 100;
    if p.is_empty() {
        write!(xml, r#"<a:endParaRPr lang="en-US" sz="{size}" dirty="0"/></a:p>"#)?;
        return Ok(());
    }

    write!(xml, r#"<a:r><a:rPr lang="en-US" sz="{size}""#)?;
    if p.bold {
        xml.push_str(r#" b="1""#);
    }
    if p.italic {
        xml.push_str(r#" i="1""#);
    }
    write!(
        xml,
        r#" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        p.color.hex(),
        escape_text(&p.text)
    )
}
