//! Package parts that do not depend on slide content, plus the small
//! generated ones (content types, relationships, document properties).
//!
//! Master and layouts carry only the two placeholder arrangements the deck
//! uses: centered title + subtitle, and title + body.

use std::fmt::Write as FmtWrite;

use chrono::{DateTime, Utc};

use crate::pptx::slide::escape_text;

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
pub(crate) const NS_ATTRS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Relationship ids in presentation.xml.rels; slides follow from `FIRST_SLIDE_REL`.
const FIRST_SLIDE_REL: usize = 6;

/// Placeholder position and size in EMUs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

pub(crate) const CENTER_TITLE_FRAME: Frame = Frame {
    x: 914_171,
    y: 2_130_425,
    cx: 10_360_610,
    cy: 1_470_025,
};
pub(crate) const SUBTITLE_FRAME: Frame = Frame {
    x: 1_828_343,
    y: 3_886_200,
    cx: 8_532_266,
    cy: 1_752_600,
};
pub(crate) const TITLE_FRAME: Frame = Frame {
    x: 609_448,
    y: 274_638,
    cx: 10_970_057,
    cy: 1_143_000,
};
pub(crate) const BODY_FRAME: Frame = Frame {
    x: 609_448,
    y: 1_600_200,
    cx: 10_970_057,
    cy: 4_525_963,
};

/// Which of the two layouts a slide is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutPart {
    TitleSlide = 1,
    TitleAndContent = 2,
}

impl LayoutPart {
    pub fn path(&self) -> String {
        format!("ppt/slideLayouts/slideLayout{}.xml", *self as u8)
    }
}

pub(crate) fn slide_path(index: usize) -> String {
    format!("ppt/slides/slide{}.xml", index + 1)
}

pub(crate) fn slide_rels_path(index: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", index + 1)
}

// ────────────────────────────────────────────────────────────────────────────
// Generated parts
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn content_types_xml(slide_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let overrides = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_LAYOUT),
        ("/ppt/slideLayouts/slideLayout2.xml", CT_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/ppt/presProps.xml", CT_PRES_PROPS),
        ("/ppt/viewProps.xml", CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
        ("/docProps/core.xml", CT_CORE),
        ("/docProps/app.xml", CT_APP),
    ];
    for (part, content_type) in overrides {
        write!(
            xml,
            r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
        )?;
    }
    for index in 0..slide_count {
        write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{CT_SLIDE}"/>"#,
            slide_path(index)
        )?;
    }

    xml.push_str("</Types>");
    Ok(xml)
}

pub(crate) fn root_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_BASE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

pub(crate) fn presentation_xml(
    slide_count: usize,
    width_emu: i64,
    height_emu: i64,
) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:presentation {NS_ATTRS} saveSubsetFonts="1">"#)?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for index in 0..slide_count {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + index,
                FIRST_SLIDE_REL + index
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(xml, r#"<p:sldSz cx="{width_emu}" cy="{height_emu}"/>"#)?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    Ok(xml)
}

pub(crate) fn presentation_rels_xml(slide_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(xml, r#"<Relationships xmlns="{REL_NS}">"#)?;
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#
    )?;
    write!(
        xml,
        r#"<Relationship Id="rId2" Type="{REL_BASE}/presProps" Target="presProps.xml"/>"#
    )?;
    write!(
        xml,
        r#"<Relationship Id="rId3" Type="{REL_BASE}/viewProps" Target="viewProps.xml"/>"#
    )?;
    write!(
        xml,
        r#"<Relationship Id="rId4" Type="{REL_BASE}/theme" Target="theme/theme1.xml"/>"#
    )?;
    write!(
        xml,
        r#"<Relationship Id="rId5" Type="{REL_BASE}/tableStyles" Target="tableStyles.xml"/>"#
    )?;
    for index in 0..slide_count {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{REL_BASE}/slide" Target="slides/slide{}.xml"/>"#,
            FIRST_SLIDE_REL + index,
            index + 1
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

pub(crate) fn slide_rels_xml(layout: LayoutPart) -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout{}.xml"/></Relationships>"#,
        layout as u8
    )
}

pub(crate) fn core_props_xml(title: &str, created: DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{}</dc:creator><cp:revision>1</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#,
        escape_text(title),
        env!("CARGO_PKG_NAME"),
    )
}

pub(crate) fn app_props_xml(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{}</Application><PresentationFormat>Widescreen</PresentationFormat><Slides>{slide_count}</Slides><AppVersion>16.0000</AppVersion></Properties>"#,
        env!("CARGO_PKG_NAME"),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Master, layouts, theme
// ────────────────────────────────────────────────────────────────────────────

const GROUP_SHAPE_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// An empty placeholder shape for masters and layouts.
fn placeholder_xml(id: u32, name: &str, ph_attrs: &str, frame: Frame) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

pub(crate) fn slide_master_xml() -> String {
    format!(
        concat!(
            r#"{decl}<p:sldMaster {ns}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{group}{title}{body}</p:spTree></p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst>"#,
            r#"<p:txStyles>"#,
            r#"<p:titleStyle><a:lvl1pPr algn="l" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
            r#"<p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900" algn="l" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>"#,
            r#"<a:lvl2pPr marL="742950" indent="-285750" algn="l" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8211;"/><a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl2pPr></p:bodyStyle>"#,
            r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle>"#,
            r#"</p:txStyles></p:sldMaster>"#
        ),
        decl = XML_DECL,
        ns = NS_ATTRS,
        group = GROUP_SHAPE_PROPS,
        title = placeholder_xml(2, "Title Placeholder 1", r#"type="title""#, TITLE_FRAME),
        body = placeholder_xml(3, "Text Placeholder 2", r#"type="body" idx="1""#, BODY_FRAME),
    )
}

pub(crate) fn slide_master_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout2.xml"/><Relationship Id="rId3" Type="{REL_BASE}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

pub(crate) fn slide_layout_xml(layout: LayoutPart) -> String {
    let (layout_type, name, shapes) = match layout {
        LayoutPart::TitleSlide => (
            "title",
            "Title Slide",
            placeholder_xml(2, "Title 1", r#"type="ctrTitle""#, CENTER_TITLE_FRAME)
                + &placeholder_xml(3, "Subtitle 2", r#"type="subTitle" idx="1""#, SUBTITLE_FRAME),
        ),
        LayoutPart::TitleAndContent => (
            "obj",
            "Title and Content",
            placeholder_xml(2, "Title 1", r#"type="title""#, TITLE_FRAME)
                + &placeholder_xml(3, "Content Placeholder 2", r#"idx="1""#, BODY_FRAME),
        ),
    };
    format!(
        r#"{XML_DECL}<p:sldLayout {NS_ATTRS} type="{layout_type}" preserve="1"><p:cSld name="{name}"><p:spTree>{GROUP_SHAPE_PROPS}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

pub(crate) fn slide_layout_rels_xml() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

pub(crate) const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements>"#,
    r#"<a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme>"#,
    r#"<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#,
    r#"<a:fmtScheme name="Office">"#,
    r#"<a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
    r#"<a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
    r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst>"#,
    r#"</a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
);

pub(crate) const PRES_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#
);

pub(crate) const VIEW_PROPS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
);

pub(crate) const TABLE_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#
);
