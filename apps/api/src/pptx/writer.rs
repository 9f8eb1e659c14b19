use std::io::{Seek, Write};

use chrono::Utc;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::deck::model::LayoutKind;
use crate::deck::{Deck, RenderError};
use crate::pptx::parts::{self, LayoutPart};
use crate::pptx::slide::slide_xml;

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn put_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    body: &str,
) -> Result<(), RenderError> {
    zip.start_file(name, file_options())?;
    zip.write_all(body.as_bytes())?;
    Ok(())
}

fn layout_for(kind: LayoutKind) -> LayoutPart {
    if kind.is_title_layout() {
        LayoutPart::TitleSlide
    } else {
        LayoutPart::TitleAndContent
    }
}

/// Writes `deck` as a complete .pptx package into `writer` and hands the writer back.
///
/// `[Content_Types].xml` goes first so streaming readers can identify the package.
pub fn write_package<W: Write + Seek>(deck: &Deck, writer: W) -> Result<W, RenderError> {
    let slide_count = deck.slide_count();
    let title = deck.slides().first().map(|s| s.title_text()).unwrap_or("");

    let mut zip = ZipWriter::new(writer);

    put_part(&mut zip, "[Content_Types].xml", &parts::content_types_xml(slide_count)?)?;
    put_part(&mut zip, "_rels/.rels", &parts::root_rels_xml())?;
    put_part(&mut zip, "docProps/core.xml", &parts::core_props_xml(title, Utc::now()))?;
    put_part(&mut zip, "docProps/app.xml", &parts::app_props_xml(slide_count))?;

    put_part(
        &mut zip,
        "ppt/presentation.xml",
        &parts::presentation_xml(slide_count, deck.width_emu(), deck.height_emu())?,
    )?;
    put_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        &parts::presentation_rels_xml(slide_count)?,
    )?;
    put_part(&mut zip, "ppt/presProps.xml", parts::PRES_PROPS_XML)?;
    put_part(&mut zip, "ppt/viewProps.xml", parts::VIEW_PROPS_XML)?;
    put_part(&mut zip, "ppt/tableStyles.xml", parts::TABLE_STYLES_XML)?;
    put_part(&mut zip, "ppt/theme/theme1.xml", parts::THEME_XML)?;

    put_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &parts::slide_master_xml())?;
    put_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &parts::slide_master_rels_xml(),
    )?;

    for layout in [LayoutPart::TitleSlide, LayoutPart::TitleAndContent] {
        let n = layout as u8;
        put_part(&mut zip, &layout.path(), &parts::slide_layout_xml(layout))?;
        put_part(
            &mut zip,
            &format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
            &parts::slide_layout_rels_xml(),
        )?;
    }

    for (index, slide) in deck.slides().iter().enumerate() {
        put_part(&mut zip, &parts::slide_path(index), &slide_xml(slide)?)?;
        put_part(
            &mut zip,
            &parts::slide_rels_path(index),
            &parts::slide_rels_xml(layout_for(slide.layout)),
        )?;
    }

    let writer = zip.finish()?;
    debug!("Wrote pptx package with {slide_count} slides");
    Ok(writer)
}
