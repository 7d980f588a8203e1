//! OOXML presentation package writer: serializes a laid-out [`Deck`] into
//! `.pptx` bytes. The package is a ZIP archive of XML parts — content types,
//! package relationships, the presentation part, one fixed slide
//! master/layout/theme, and one slide part per page with its media.
//!
//! Geometry arrives in inches and is converted to EMU (914400 per inch);
//! font sizes arrive in points and are written in hundredths.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::RenderError;
use super::layout::{Align, Anchor, Deck, ImageFrame, Page, Rect, Shape, TextFrame};
use super::style::StyleSheet;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn emu(inches: f32) -> i64 {
    (inches as f64 * 914_400.0).round() as i64
}

fn pt100(points: f32) -> i32 {
    (points as f64 * 100.0).round() as i32
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Media part carried alongside a slide.
#[derive(Debug)]
struct MediaPart {
    name: String,
    bytes: Vec<u8>,
    extension: String,
}

/// Serialize the deck into an in-memory `.pptx` package.
pub fn deck_to_bytes(deck: &Deck, style: &StyleSheet) -> Result<Vec<u8>, RenderError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let add = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, path: &str, content: &[u8]| -> Result<(), RenderError> {
        zip.start_file(path, options)?;
        zip.write_all(content)?;
        Ok(())
    };

    // Load image bytes up front; a slide whose image cannot be read keeps
    // rendering without it.
    let mut media: Vec<Option<MediaPart>> = Vec::with_capacity(deck.pages.len());
    let mut media_index = 0usize;
    for (page_no, page) in deck.pages.iter().enumerate() {
        media.push(page.image.as_ref().and_then(|img| {
            match load_media(img, media_index + 1) {
                Ok(part) => {
                    media_index += 1;
                    Some(part)
                }
                Err(reason) => {
                    log::warn!(
                        "Could not add image to slide {}: {}: {}",
                        page_no,
                        img.path.display(),
                        reason
                    );
                    None
                }
            }
        }));
    }

    let extensions: BTreeSet<String> = media
        .iter()
        .flatten()
        .map(|m| m.extension.clone())
        .collect();
    let slide_count = deck.pages.len();

    add(&mut zip, "[Content_Types].xml", content_types_xml(slide_count, &extensions).as_bytes())?;
    add(&mut zip, "_rels/.rels", ROOT_RELS_XML.as_bytes())?;
    add(&mut zip, "docProps/core.xml", core_props_xml(&deck.title).as_bytes())?;
    add(&mut zip, "docProps/app.xml", APP_PROPS_XML.as_bytes())?;
    add(&mut zip, "ppt/presentation.xml", presentation_xml(slide_count, style).as_bytes())?;
    add(&mut zip, "ppt/_rels/presentation.xml.rels", presentation_rels_xml(slide_count).as_bytes())?;
    add(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML.as_bytes())?;
    add(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS_XML.as_bytes())?;
    add(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML.as_bytes())?;
    add(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS_XML.as_bytes())?;
    add(&mut zip, "ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

    for (i, page) in deck.pages.iter().enumerate() {
        let n = i + 1;
        let part = media[i].as_ref();
        add(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            slide_xml(page, style, part.is_some()).as_bytes(),
        )?;
        add(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide_rels_xml(part.map(|m| m.name.as_str())).as_bytes(),
        )?;
        if let Some(m) = part {
            add(&mut zip, &format!("ppt/media/{}", m.name), &m.bytes)?;
        }
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Read image bytes and derive the media part name. The error carries the
/// reason the image was skipped (unsupported extension, unreadable file).
fn load_media(img: &ImageFrame, index: usize) -> Result<MediaPart, String> {
    let extension = img
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| "missing file extension".to_string())?;
    if !matches!(extension.as_str(), "png" | "jpg" | "jpeg" | "gif") {
        return Err(format!("unsupported image type .{extension}"));
    }
    let bytes = std::fs::read(&img.path).map_err(|e| e.to_string())?;
    Ok(MediaPart {
        name: format!("image{index}.{extension}"),
        bytes,
        extension,
    })
}

fn media_content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

fn content_types_xml(slide_count: usize, extensions: &BTreeSet<String>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
"#,
    );
    for ext in extensions {
        xml.push_str(&format!(
            "<Default Extension=\"{ext}\" ContentType=\"{}\"/>\n",
            media_content_type(ext)
        ));
    }
    xml.push_str(concat!(
        "<Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\n",
        "<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\n",
        "<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\n",
        "<Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\n",
        "<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\n",
        "<Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>\n",
    ));
    for n in 1..=slide_count {
        xml.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{n}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n"
        ));
    }
    xml.push_str("</Types>\n");
    xml
}

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>
"#;

fn core_props_xml(title: &str) -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{}</dc:title>
<dc:creator>Deck Builder</dc:creator>
<dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
<dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
</cp:coreProperties>
"#,
        escape_xml(title)
    )
}

const APP_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>Deck Builder</Application>
</Properties>
"#;

fn presentation_xml(slide_count: usize, style: &StyleSheet) -> String {
    let mut slide_ids = String::new();
    for n in 1..=slide_count {
        // rId1 is the slide master; slides start at rId2.
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            255 + n,
            n + 1
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst>{slide_ids}</p:sldIdLst>
<p:sldSz cx="{}" cy="{}"/>
<p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>
"#,
        emu(style.metrics.page_width),
        emu(style.metrics.page_height)
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
"#,
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide{n}.xml\"/>\n",
            n + 1
        ));
    }
    xml.push_str("</Relationships>\n");
    xml
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>
</p:sldMaster>
"#;

const SLIDE_MASTER_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>
"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>
"#;

const SLIDE_LAYOUT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>
"#;

/// Minimal but schema-complete theme: color scheme, font scheme, and the
/// three-entry format scheme lists PowerPoint insists on.
const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deck Builder">
<a:themeElements>
<a:clrScheme name="Deck Builder">
<a:dk1><a:srgbClr val="333333"/></a:dk1>
<a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
<a:dk2><a:srgbClr val="1C1C1C"/></a:dk2>
<a:lt2><a:srgbClr val="F8F9FA"/></a:lt2>
<a:accent1><a:srgbClr val="00ADEE"/></a:accent1>
<a:accent2><a:srgbClr val="0088BB"/></a:accent2>
<a:accent3><a:srgbClr val="66CCEE"/></a:accent3>
<a:accent4><a:srgbClr val="AAAAAA"/></a:accent4>
<a:accent5><a:srgbClr val="666666"/></a:accent5>
<a:accent6><a:srgbClr val="333333"/></a:accent6>
<a:hlink><a:srgbClr val="0563C1"/></a:hlink>
<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
</a:clrScheme>
<a:fontScheme name="Deck Builder">
<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
</a:fontScheme>
<a:fmtScheme name="Office">
<a:fillStyleLst>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
</a:fillStyleLst>
<a:lnStyleLst>
<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
</a:lnStyleLst>
<a:effectStyleLst>
<a:effectStyle><a:effectLst/></a:effectStyle>
<a:effectStyle><a:effectLst/></a:effectStyle>
<a:effectStyle><a:effectLst/></a:effectStyle>
</a:effectStyleLst>
<a:bgFillStyleLst>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
</a:bgFillStyleLst>
</a:fmtScheme>
</a:themeElements>
</a:theme>
"#;

fn xfrm(frame: &Rect) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        emu(frame.x),
        emu(frame.y),
        emu(frame.w),
        emu(frame.h)
    )
}

fn shape_xml(id: usize, shape: &Shape) -> String {
    format!(
        concat!(
            "<p:sp>",
            "<p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Shape {id}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>",
            "<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>",
            "<a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill>",
            "<a:ln><a:noFill/></a:ln></p:spPr>",
            "<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr/></a:p></p:txBody>",
            "</p:sp>"
        ),
        id = id,
        xfrm = xfrm(&shape.frame),
        fill = shape.fill.hex().to_ascii_uppercase(),
    )
}

fn text_frame_xml(id: usize, text: &TextFrame, font_face: &str) -> String {
    let anchor = match text.anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
    };
    let align = match text.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let mut runs = String::new();
    for run in &text.runs {
        let bold = if run.bold { " b=\"1\"" } else { "" };
        runs.push_str(&format!(
            concat!(
                "<a:r><a:rPr lang=\"en-US\" sz=\"{sz}\"{bold} dirty=\"0\">",
                "<a:solidFill><a:srgbClr val=\"{color}\"/></a:solidFill>",
                "<a:latin typeface=\"{font}\"/></a:rPr>",
                "<a:t>{text}</a:t></a:r>"
            ),
            sz = pt100(run.size),
            bold = bold,
            color = run.color.hex().to_ascii_uppercase(),
            font = escape_xml(font_face),
            text = escape_xml(&run.text),
        ));
    }
    format!(
        concat!(
            "<p:sp>",
            "<p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Text {id}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>",
            "<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>",
            "<p:txBody><a:bodyPr wrap=\"square\" anchor=\"{anchor}\"/><a:lstStyle/>",
            "<a:p><a:pPr algn=\"{align}\"/>{runs}</a:p></p:txBody>",
            "</p:sp>"
        ),
        id = id,
        xfrm = xfrm(&text.frame),
        anchor = anchor,
        align = align,
        runs = runs,
    )
}

fn pic_xml(id: usize, frame: &Rect) -> String {
    format!(
        concat!(
            "<p:pic>",
            "<p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Image {id}\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>",
            "<p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>",
            "<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>",
            "</p:pic>"
        ),
        id = id,
        xfrm = xfrm(frame),
    )
}

fn slide_xml(page: &Page, style: &StyleSheet, has_image: bool) -> String {
    let mut elements = String::new();
    let mut id = 2usize;
    for shape in &page.shapes {
        elements.push_str(&shape_xml(id, shape));
        id += 1;
    }
    for text in &page.texts {
        elements.push_str(&text_frame_xml(id, text, style.font_face));
        id += 1;
    }
    if has_image {
        if let Some(img) = &page.image {
            elements.push_str(&pic_xml(id, &img.frame));
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">
<p:cSld>
<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{bg}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>
<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{elements}</p:spTree>
</p:cSld>
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>
"#,
        bg = page.background.hex().to_ascii_uppercase(),
        elements = elements,
    )
}

fn slide_rels_xml(image_part: Option<&str>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
"#,
    );
    if let Some(name) = image_part {
        xml.push_str(&format!(
            "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"../media/{name}\"/>\n"
        ));
    }
    xml.push_str("</Relationships>\n");
    xml
}
