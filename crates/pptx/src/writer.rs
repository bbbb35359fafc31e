//! PPTX document writer.
//!
//! Buffers slide operations and serializes them into a minimal
//! PresentationML package: one master, one blank layout, one theme and one
//! part per slide.

use deckgen_core::types::DEFAULT_FONT;
use deckgen_core::{
    Align, Anchor, Color, DocumentHandle, DocumentWriter, Error, Region, Result, TextStyle,
};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// English Metric Units per inch.
const EMU_PER_INCH: f64 = 914_400.0;

/// Slide size in EMU (10 x 7.5 inches).
const SLIDE_WIDTH: i64 = 9_144_000;
const SLIDE_HEIGHT: i64 = 6_858_000;

/// Namespace declarations shared by PresentationML parts.
const PML_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Empty shape tree header every slide-like part starts with.
const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Whether `c` may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Escape text for XML, dropping characters XML 1.0 does not allow.
fn xml_escape(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        return escape(raw);
    }

    let cleaned: String = raw.chars().filter(|c| is_xml_char(*c)).collect();
    Cow::Owned(escape(&cleaned).into_owned())
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// A text block waiting to be serialized.
#[derive(Debug, Clone)]
struct TextShape {
    region: Region,
    text: String,
    style: TextStyle,
}

/// A slide waiting to be serialized.
#[derive(Debug, Clone, Default)]
struct SlideDraft {
    shapes: Vec<TextShape>,
    background: Option<Color>,
}

/// Writer that produces a `.pptx` package.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    title: String,
    author: String,
    company: String,
    slides: Vec<SlideDraft>,
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self {
            title: "Generated Presentation".to_string(),
            author: "Text to Presentation Generator".to_string(),
            company: "Auto-Generated".to_string(),
            slides: Vec::new(),
        }
    }
}

impl PptxWriter {
    /// Create a new writer with default document properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title property.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the document author property.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the document company property.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    fn current(&mut self) -> Result<&mut SlideDraft> {
        self.slides
            .last_mut()
            .ok_or_else(|| Error::Writer("no slide has been started".to_string()))
    }

    /// Font for the theme: the first font any text block used.
    fn theme_font(&self) -> &str {
        self.slides
            .iter()
            .flat_map(|s| s.shapes.iter())
            .map(|shape| shape.style.font.as_str())
            .next()
            .unwrap_or(DEFAULT_FONT)
    }

    fn write_package(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml()),
            ("_rels/.rels".to_string(), root_rels_xml()),
            ("docProps/core.xml".to_string(), self.core_xml()),
            ("docProps/app.xml".to_string(), self.app_xml()),
            ("ppt/presentation.xml".to_string(), self.presentation_xml()),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                self.presentation_rels_xml(),
            ),
            ("ppt/presProps.xml".to_string(), pres_props_xml()),
            ("ppt/tableStyles.xml".to_string(), table_styles_xml()),
            ("ppt/theme/theme1.xml".to_string(), theme_xml(self.theme_font())),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), slide_master_xml()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                slide_master_rels_xml(),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), slide_layout_xml()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                slide_layout_rels_xml(),
            ),
        ];

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            parts.push((format!("ppt/slides/slide{}.xml", number), slide_xml(slide)));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                slide_rels_xml(),
            ));
        }

        for (path, content) in &parts {
            zip.start_file(path.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", path, e)))?;
            zip.write_all(content.as_bytes())?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!(
            "Wrote PPTX package: {} parts, {} slides",
            parts.len(),
            self.slides.len()
        );

        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

        let overrides = [
            ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
            ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
            ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
            ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
            ("/ppt/presProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"),
            ("/ppt/tableStyles.xml", "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"),
            ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
            ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
        ];
        for (part, content_type) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            ));
        }

        for number in 1..=self.slides.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                number
            ));
        }

        xml.push_str("</Types>");
        xml
    }

    fn core_xml(&self) -> String {
        format!(
            concat!(
                "{}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{}</dc:title><dc:creator>{}</dc:creator><cp:lastModifiedBy>{}</cp:lastModifiedBy>",
                "</cp:coreProperties>"
            ),
            XML_DECLARATION,
            xml_escape(&self.title),
            xml_escape(&self.author),
            xml_escape(&self.author)
        )
    }

    fn app_xml(&self) -> String {
        format!(
            concat!(
                "{}",
                r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
                r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
                "<Application>deckgen</Application><Slides>{}</Slides><Company>{}</Company>",
                "</Properties>"
            ),
            XML_DECLARATION,
            self.slides.len(),
            xml_escape(&self.company)
        )
    }

    fn presentation_xml(&self) -> String {
        let mut xml = format!(
            r#"{}<p:presentation {} saveSubsetFonts="1">"#,
            XML_DECLARATION, PML_NAMESPACES
        );
        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for index in 0..self.slides.len() {
                xml.push_str(&format!(
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    256 + index,
                    index + 2
                ));
            }
            xml.push_str("</p:sldIdLst>");
        }

        xml.push_str(&format!(
            r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/><p:notesSz cx="{}" cy="{}"/>"#,
            SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
        ));
        xml.push_str("</p:presentation>");
        xml
    }

    fn presentation_rels_xml(&self) -> String {
        let mut rels = vec![(
            "rId1".to_string(),
            "slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        )];

        for index in 0..self.slides.len() {
            rels.push((
                format!("rId{}", index + 2),
                "slide",
                format!("slides/slide{}.xml", index + 1),
            ));
        }

        let next = self.slides.len() + 2;
        rels.push((format!("rId{}", next), "presProps", "presProps.xml".to_string()));
        rels.push((format!("rId{}", next + 1), "theme", "theme/theme1.xml".to_string()));
        rels.push((
            format!("rId{}", next + 2),
            "tableStyles",
            "tableStyles.xml".to_string(),
        ));

        relationships_xml(
            rels.iter()
                .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str())),
        )
    }
}

impl DocumentWriter for PptxWriter {
    type Document = PptxDocument;

    fn start_slide(&mut self) -> Result<()> {
        self.slides.push(SlideDraft::default());
        Ok(())
    }

    fn place_text(&mut self, region: Region, text: &str, style: &TextStyle) -> Result<()> {
        self.current()?.shapes.push(TextShape {
            region,
            text: text.to_string(),
            style: style.clone(),
        });
        Ok(())
    }

    fn set_background(&mut self, color: &Color) -> Result<()> {
        self.current()?.background = Some(color.clone());
        Ok(())
    }

    fn finalize(self) -> Result<PptxDocument> {
        let bytes = self.write_package()?;
        Ok(PptxDocument { bytes })
    }
}

/// A finished `.pptx` package.
#[derive(Debug, Clone)]
pub struct PptxDocument {
    bytes: Vec<u8>,
}

impl PptxDocument {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl DocumentHandle for PptxDocument {
    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn relationships_xml<'a>(rels: impl Iterator<Item = (&'a str, &'a str, &'a str)>) -> String {
    let mut xml = format!(r#"{}<Relationships xmlns="{}">"#, XML_DECLARATION, REL_NS);
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_TYPE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn root_rels_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Relationships xmlns="{}">"#,
            r#"<Relationship Id="rId1" Type="{}/officeDocument" Target="ppt/presentation.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{}/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECLARATION, REL_NS, REL_TYPE, REL_TYPE
    )
}

fn pres_props_xml() -> String {
    format!(r#"{}<p:presentationPr {}/>"#, XML_DECLARATION, PML_NAMESPACES)
}

fn table_styles_xml() -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        XML_DECLARATION
    )
}

fn slide_master_xml() -> String {
    format!(
        concat!(
            "{}<p:sldMaster {}>",
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
            "<p:spTree>{}</p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>",
            "</p:sldMaster>"
        ),
        XML_DECLARATION, PML_NAMESPACES, SP_TREE_HEADER
    )
}

fn slide_master_rels_xml() -> String {
    relationships_xml(
        [
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ]
        .into_iter(),
    )
}

fn slide_layout_xml() -> String {
    format!(
        concat!(
            r#"{}<p:sldLayout {} type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
            "</p:sldLayout>"
        ),
        XML_DECLARATION, PML_NAMESPACES, SP_TREE_HEADER
    )
}

fn slide_layout_rels_xml() -> String {
    relationships_xml(
        [("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")].into_iter(),
    )
}

fn slide_rels_xml() -> String {
    relationships_xml(
        [("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")].into_iter(),
    )
}

/// Serialize one slide. The background goes before the shape tree, as the
/// schema requires, even though it is set after the text blocks.
fn slide_xml(slide: &SlideDraft) -> String {
    let mut xml = format!("{}<p:sld {}><p:cSld>", XML_DECLARATION, PML_NAMESPACES);

    if let Some(color) = &slide.background {
        xml.push_str(&format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            color.hex()
        ));
    }

    xml.push_str("<p:spTree>");
    xml.push_str(SP_TREE_HEADER);
    for (index, shape) in slide.shapes.iter().enumerate() {
        shape_xml(&mut xml, shape, index as u32 + 2);
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn shape_xml(xml: &mut String, shape: &TextShape, id: u32) {
    let style = &shape.style;
    let region = &shape.region;

    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&format!(
        r#"<p:cNvPr id="{}" name="Text {}"/><p:cNvSpPr txBox="1"/><p:nvPr/>"#,
        id,
        id - 1
    ));
    xml.push_str("</p:nvSpPr><p:spPr><a:xfrm>");
    xml.push_str(&format!(
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
        emu(region.x),
        emu(region.y),
        emu(region.width),
        emu(region.height)
    ));
    xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    let anchor = match style.anchor {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
    };
    xml.push_str(&format!(
        r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        anchor
    ));

    let align = match style.align {
        Align::Left => "l",
        Align::Center => "ctr",
    };
    let run_props = format!(
        r#"<a:rPr lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/></a:rPr>"#,
        style.size * 100,
        if style.bold { 1 } else { 0 },
        style.color.hex(),
        xml_escape(&style.font)
    );

    for line in shape.text.split('\n') {
        xml.push_str(&format!(r#"<a:p><a:pPr algn="{}"/>"#, align));
        xml.push_str("<a:r>");
        xml.push_str(&run_props);
        xml.push_str(&format!("<a:t>{}</a:t>", xml_escape(line)));
        xml.push_str("</a:r></a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
}

/// Office-style theme with the given font as both heading and body face.
fn theme_xml(font: &str) -> String {
    let font = xml_escape(font);
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = format!(r#"<a:ln w="9525">{}</a:ln>"#, fill);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        concat!(
            "{decl}",
            r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deck Theme">"#,
            "<a:themeElements>",
            r#"<a:clrScheme name="Deck">"#,
            r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
            r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="1F4E79"/></a:dk2>"#,
            r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="70AD47"/></a:accent1>"#,
            r#"<a:accent2><a:srgbClr val="FFC000"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="C5504B"/></a:accent3>"#,
            r#"<a:accent4><a:srgbClr val="4472C4"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#,
            r#"<a:accent6><a:srgbClr val="A5A5A5"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
            r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
            "</a:clrScheme>",
            r#"<a:fontScheme name="Deck">"#,
            r#"<a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            "</a:fontScheme>",
            r#"<a:fmtScheme name="Deck">"#,
            "<a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>",
            "<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>",
            "<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>",
            "</a:fmtScheme>",
            "</a:themeElements>",
            "</a:theme>"
        ),
        decl = XML_DECLARATION,
        font = font,
        fill = fill,
        line = line,
        effect = effect
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThemeAnalyzer;
    use deckgen_core::style::bind;
    use deckgen_core::{
        assemble_document, Deck, SlideKind, SlideUnit, TemplateAnalyzer, TemplateDescriptor,
        TemplateFile,
    };
    use std::io::Read;
    use zip::ZipArchive;

    fn build(units: Vec<SlideUnit>) -> PptxDocument {
        let deck = Deck::build(units).unwrap();
        let slides = bind(&deck, &TemplateDescriptor::default()).unwrap();
        assemble_document(&slides, PptxWriter::new()).unwrap()
    }

    fn read_part(doc: &PptxDocument, path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(doc.as_bytes())).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_xml_escape_drops_control_chars() {
        assert_eq!(xml_escape("Page\u{0C}break"), "Pagebreak");
        assert_eq!(xml_escape("tab\tkept & <ok>"), "tab\tkept &amp; &lt;ok&gt;");
        assert_eq!(xml_escape("a\u{0B}b\u{0}c\u{FFFF}"), "abc");
        assert_eq!(xml_escape("caf\u{e9} \u{1F600}"), "caf\u{e9} \u{1F600}");
    }

    #[test]
    fn test_slide_xml_has_no_control_chars() {
        let mut content = SlideUnit::new(SlideKind::Content, "Page\u{0C}break");
        content.push_line("tab\u{0B}vt");
        let doc = build(vec![content]);

        let xml = read_part(&doc, "ppt/slides/slide1.xml");
        assert!(xml.chars().all(is_xml_char));
        assert!(xml.contains("<a:t>Pagebreak</a:t>"));
        assert!(xml.contains("<a:t>tabvt</a:t>"));
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(0.5), 457_200);
        assert_eq!(emu(10.0), SLIDE_WIDTH);
        assert_eq!(emu(7.5), SLIDE_HEIGHT);
    }

    #[test]
    fn test_package_parts() {
        let doc = build(vec![
            SlideUnit::new(SlideKind::Title, "Hello"),
            SlideUnit::new(SlideKind::Section, "Part"),
        ]);
        let archive = ZipArchive::new(Cursor::new(doc.as_bytes())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));

        let types = read_part(&doc, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));

        let presentation = read_part(&doc, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));

        let rels = read_part(&doc, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId3""#));
        assert!(rels.contains(r#"Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Target="theme/theme1.xml""#));
    }

    #[test]
    fn test_slide_content() {
        let mut content = SlideUnit::new(SlideKind::Content, "Q&A");
        content.push_bullet("Ask <anything>");
        content.push_line("Thanks");
        let doc = build(vec![content]);

        let xml = read_part(&doc, "ppt/slides/slide1.xml");
        assert!(xml.contains("<a:t>Q&amp;A</a:t>"));
        assert!(xml.contains("<a:t>\u{2022} Ask &lt;anything&gt;</a:t>"));
        assert!(xml.contains("<a:t>Thanks</a:t>"));
        assert!(xml.contains(r#"<a:srgbClr val="70AD47"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="333333"/>"#));
        assert!(xml.contains(r#"sz="2400" b="1""#));
        assert!(xml.contains(r#"anchor="t""#));

        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(xml.contains(r#"<a:srgbClr val="1F4E79"/></a:solidFill><a:effectLst/>"#));
    }

    #[test]
    fn test_title_geometry() {
        let doc = build(vec![SlideUnit::new(SlideKind::Title, "Hello")]);
        let xml = read_part(&doc, "ppt/slides/slide1.xml");

        assert!(xml.contains(r#"<a:off x="914400" y="2286000"/><a:ext cx="7315200" cy="1828800"/>"#));
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains(r#"sz="3600""#));
    }

    #[test]
    fn test_document_properties() {
        let deck = Deck::build(vec![SlideUnit::new(SlideKind::Title, "Hi")]).unwrap();
        let slides = bind(&deck, &TemplateDescriptor::default()).unwrap();
        let doc = assemble_document(&slides, PptxWriter::new().with_title("Quarterly <Review>"))
            .unwrap();

        let core = read_part(&doc, "docProps/core.xml");
        assert!(core.contains("<dc:title>Quarterly &lt;Review&gt;</dc:title>"));
        assert!(core.contains("<dc:creator>Text to Presentation Generator</dc:creator>"));

        let app = read_part(&doc, "docProps/app.xml");
        assert!(app.contains("<Slides>1</Slides>"));
        assert!(app.contains("<Company>Auto-Generated</Company>"));
    }

    #[test]
    fn test_output_reads_back_as_template() {
        let deck = Deck::build(vec![SlideUnit::new(SlideKind::Title, "Hi")]).unwrap();
        let template = TemplateDescriptor::new(
            TemplateDescriptor::default().palette,
            "Georgia",
        );
        let slides = bind(&deck, &template).unwrap();
        let doc = assemble_document(&slides, PptxWriter::new()).unwrap();

        let analyzed = ThemeAnalyzer::new()
            .analyze(&TemplateFile::new("out.pptx", doc.into_bytes()))
            .unwrap();

        assert_eq!(analyzed.font, "Georgia");
        assert_eq!(analyzed.layouts, vec!["Blank"]);
        assert_eq!(analyzed.palette[0].hex(), "1F4E79");
        assert_eq!(analyzed.palette[1].hex(), "70AD47");
    }

    #[test]
    fn test_text_before_slide_is_an_error() {
        let mut writer = PptxWriter::new();
        assert!(matches!(
            writer.set_background(&Color::parse("#FFFFFF").unwrap()),
            Err(Error::Writer(_))
        ));
    }

    #[test]
    fn test_empty_deck_package() {
        let doc = PptxWriter::new().finalize().unwrap();
        let presentation = read_part(&doc, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
    }
}
