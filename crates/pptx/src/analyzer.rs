//! Template analysis for PPTX/POTX packages.
//!
//! Reads the package theme for its color and font schemes, and the slide
//! layouts for their names.

use deckgen_core::template::MAX_TEMPLATE_BYTES;
use deckgen_core::types::DEFAULT_FONT;
use deckgen_core::{Color, Error, Result, TemplateAnalyzer, TemplateDescriptor, TemplateFile};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// Theme color slots that make up the palette, in palette order.
const PALETTE_SLOTS: [&str; 8] = [
    "dk2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6", "lt2",
];

/// Every color slot a `clrScheme` may contain.
const SCHEME_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// Analyzer that derives a template descriptor from an OOXML package.
#[derive(Debug, Clone, Copy)]
pub struct ThemeAnalyzer {
    /// Largest decompressed size accepted for a single XML part.
    max_part_bytes: usize,
}

impl Default for ThemeAnalyzer {
    fn default() -> Self {
        Self {
            max_part_bytes: MAX_TEMPLATE_BYTES,
        }
    }
}

impl ThemeAnalyzer {
    /// Create a new theme analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decompressed size limit for each theme and layout part.
    pub fn with_max_part_bytes(mut self, limit: usize) -> Self {
        self.max_part_bytes = limit;
        self
    }

    /// Analyze a package from a reader.
    pub fn analyze_reader<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<TemplateDescriptor> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let layouts = self.read_layout_names(&mut archive)?;

        let (palette, theme) = match self.find_part(&archive, "ppt/theme/theme") {
            Some(path) => {
                let xml = read_file_from_archive(&mut archive, &path, self.max_part_bytes)?;
                let theme = parse_theme(&xml)?;
                let palette: Vec<Color> = PALETTE_SLOTS
                    .iter()
                    .filter_map(|slot| theme.colors.get(*slot).cloned())
                    .collect();
                (palette, theme)
            }
            None => {
                log::warn!("'{}' has no theme part, using built-in colors", filename);
                (TemplateDescriptor::default().palette, ThemeInfo::default())
            }
        };

        let font = theme
            .major_font
            .or(theme.minor_font)
            .unwrap_or_else(|| DEFAULT_FONT.to_string());

        log::debug!(
            "Analyzed '{}': palette {:?}, font {}, layouts {:?}",
            filename,
            palette.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            font,
            layouts
        );

        Ok(TemplateDescriptor::new(palette, font).with_layouts(layouts))
    }

    /// Path of the lowest-numbered part under `prefix` (e.g. `theme1.xml`).
    fn find_part<R: Read + Seek>(&self, archive: &ZipArchive<R>, prefix: &str) -> Option<String> {
        numbered_parts(archive, prefix).into_iter().next()
    }

    /// Names of all slide layouts, ordered by layout number.
    fn read_layout_names<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for path in numbered_parts(archive, "ppt/slideLayouts/slideLayout") {
            let xml = read_file_from_archive(archive, &path, self.max_part_bytes)?;
            match layout_name(&xml)? {
                Some(name) => names.push(name),
                None => log::debug!("Layout '{}' has no name", path),
            }
        }

        Ok(names)
    }
}

impl TemplateAnalyzer for ThemeAnalyzer {
    fn analyze(&self, file: &TemplateFile) -> Result<TemplateDescriptor> {
        self.analyze_reader(Cursor::new(&file.bytes), &file.filename)
            .map_err(|e| match e {
                Error::ZipError(msg) | Error::XmlError(msg) => {
                    Error::Template(format!("'{}' could not be read: {}", file.filename, msg))
                }
                other => other,
            })
    }
}

/// Colors and fonts found in a theme part.
#[derive(Debug, Default)]
struct ThemeInfo {
    colors: HashMap<String, Color>,
    major_font: Option<String>,
    minor_font: Option<String>,
}

/// Which font block of the font scheme we are in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FontBlock {
    Major,
    Minor,
}

fn parse_theme(xml: &str) -> Result<ThemeInfo> {
    let mut info = ThemeInfo::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_color_scheme = false;
    let mut slot: Option<String> = None;
    let mut font_block: Option<FontBlock> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"clrScheme" => in_color_scheme = true,
                    b"majorFont" => font_block = Some(FontBlock::Major),
                    b"minorFont" => font_block = Some(FontBlock::Minor),
                    other if in_color_scheme => {
                        let other = String::from_utf8_lossy(other);
                        if SCHEME_SLOTS.contains(&&*other) {
                            slot = Some(other.into_owned());
                        } else {
                            visit_leaf(e, slot.as_deref(), font_block, &mut info);
                        }
                    }
                    _ => visit_leaf(e, slot.as_deref(), font_block, &mut info),
                }
            }
            Ok(Event::Empty(ref e)) => visit_leaf(e, slot.as_deref(), font_block, &mut info),
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"clrScheme" => in_color_scheme = false,
                    b"majorFont" | b"minorFont" => font_block = None,
                    other => {
                        if slot.as_deref().map(str::as_bytes) == Some(other) {
                            slot = None;
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing theme: {}", e)));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Record a color value or a Latin typeface, depending on where we are.
fn visit_leaf(e: &BytesStart, slot: Option<&str>, font_block: Option<FontBlock>, info: &mut ThemeInfo) {
    let name = e.name();
    match local_name(name.as_ref()) {
        b"srgbClr" | b"sysClr" => {
            if let (Some(slot), Some(color)) = (slot, color_value(e)) {
                info.colors.entry(slot.to_string()).or_insert(color);
            }
        }
        b"latin" => {
            let typeface = attribute(e, b"typeface").filter(|t| !t.is_empty());
            match font_block {
                Some(FontBlock::Major) if info.major_font.is_none() => info.major_font = typeface,
                Some(FontBlock::Minor) if info.minor_font.is_none() => info.minor_font = typeface,
                _ => {}
            }
        }
        _ => {}
    }
}

/// Color of an `srgbClr` (its `val`) or `sysClr` (its `lastClr`).
fn color_value(e: &BytesStart) -> Option<Color> {
    let key: &[u8] = if local_name(e.name().as_ref()) == b"sysClr" {
        b"lastClr"
    } else {
        b"val"
    };

    let value = attribute(e, key)?;
    match Color::parse(&value) {
        Ok(color) => Some(color),
        Err(_) => {
            log::warn!("Ignoring unparseable theme color '{}'", value);
            None
        }
    }
}

/// The `name` attribute of a layout's `cSld` element.
fn layout_name(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"cSld" =>
            {
                return Ok(attribute(e, b"name").filter(|n| !n.is_empty()));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide layout: {}", e)));
            }
            _ => {}
        }
    }
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Part paths `<prefix><N>.xml`, ordered by N.
fn numbered_parts<R: Read + Seek>(archive: &ZipArchive<R>, prefix: &str) -> Vec<String> {
    let mut parts: Vec<(usize, String)> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .filter_map(|name| extract_part_number(name).map(|n| (n, name.to_string())))
        .collect();

    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

/// Read a file from the ZIP archive, decompressing at most `limit` bytes.
fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    limit: usize,
) -> Result<String> {
    let file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = Vec::new();
    file.take(limit as u64 + 1)
        .read_to_end(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    if content.len() > limit {
        return Err(Error::ZipError(format!(
            "'{}' decompresses to more than {} bytes",
            path, limit
        )));
    }

    String::from_utf8(content)
        .map_err(|e| Error::XmlError(format!("'{}' is not valid UTF-8: {}", path, e)))
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a part number from a path like "ppt/theme/theme3.xml".
fn extract_part_number(path: &str) -> Option<usize> {
    let stem = path.strip_suffix(".xml")?;
    let digits: String = stem.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Brand">
  <a:themeElements>
    <a:clrScheme name="Brand">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="1F4E79"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="70AD47"/></a:accent1>
      <a:accent2><a:srgbClr val="FFC000"/></a:accent2>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
    </a:clrScheme>
    <a:fontScheme name="Brand">
      <a:majorFont><a:latin typeface="Georgia"/><a:ea typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="Verdana"/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    fn layout(name: &str) -> String {
        format!(
            r#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{}"><p:spTree/></p:cSld></p:sldLayout>"#,
            name
        )
    }

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in parts {
            zip.start_file(*path, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_analyze_theme_and_layouts() {
        let layout1 = layout("Title Slide");
        let layout2 = layout("Title and Content");
        let layout10 = layout("Comparison");
        let bytes = package(&[
            ("ppt/theme/theme1.xml", THEME),
            ("ppt/slideLayouts/slideLayout10.xml", &layout10),
            ("ppt/slideLayouts/slideLayout2.xml", &layout2),
            ("ppt/slideLayouts/slideLayout1.xml", &layout1),
            ("ppt/slideLayouts/_rels/slideLayout1.xml.rels", "<Relationships/>"),
        ]);

        let template = ThemeAnalyzer::new()
            .analyze(&TemplateFile::new("brand.potx", bytes))
            .unwrap();

        let palette: Vec<String> = template.palette.iter().map(|c| c.to_string()).collect();
        assert_eq!(palette, vec!["#1F4E79", "#70AD47", "#FFC000", "#E7E6E6"]);
        assert_eq!(template.font, "Georgia");
        assert_eq!(
            template.layouts,
            vec!["Title Slide", "Title and Content", "Comparison"]
        );
    }

    #[test]
    fn test_sys_color_uses_last_color() {
        let theme = THEME.replace(
            r#"<a:dk2><a:srgbClr val="1F4E79"/></a:dk2>"#,
            r#"<a:dk2><a:sysClr val="windowText" lastClr="101010"/></a:dk2>"#,
        );
        let info = parse_theme(&theme).unwrap();
        assert_eq!(info.colors["dk2"].hex(), "101010");
        assert_eq!(info.colors["dk1"].hex(), "000000");
    }

    #[test]
    fn test_minor_font_fallback() {
        let theme = THEME.replace(r#"<a:latin typeface="Georgia"/>"#, r#"<a:latin typeface=""/>"#);
        let bytes = package(&[("ppt/theme/theme1.xml", &theme)]);

        let template = ThemeAnalyzer::new()
            .analyze(&TemplateFile::new("brand.pptx", bytes))
            .unwrap();
        assert_eq!(template.font, "Verdana");
        assert!(template.layouts.is_empty());
    }

    #[test]
    fn test_missing_theme_uses_builtin() {
        let bytes = package(&[("ppt/presentation.xml", "<p:presentation/>")]);
        let template = ThemeAnalyzer::new()
            .analyze(&TemplateFile::new("bare.pptx", bytes))
            .unwrap();

        assert_eq!(template.palette, TemplateDescriptor::default().palette);
        assert_eq!(template.font, DEFAULT_FONT);
    }

    #[test]
    fn test_part_size_limit() {
        let bytes = package(&[("ppt/theme/theme1.xml", THEME)]);
        let file = TemplateFile::new("brand.pptx", bytes);

        let result = ThemeAnalyzer::new()
            .with_max_part_bytes(THEME.len() - 1)
            .analyze(&file);
        match result {
            Err(Error::Template(msg)) => assert!(msg.contains("more than")),
            other => panic!("expected template error, got {:?}", other),
        }

        let template = ThemeAnalyzer::new()
            .with_max_part_bytes(THEME.len())
            .analyze(&file)
            .unwrap();
        assert_eq!(template.font, "Georgia");
    }

    #[test]
    fn test_not_a_zip() {
        let result = ThemeAnalyzer::new().analyze(&TemplateFile::new("fake.pptx", b"hello".to_vec()));
        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[test]
    fn test_extract_part_number() {
        assert_eq!(extract_part_number("ppt/theme/theme1.xml"), Some(1));
        assert_eq!(extract_part_number("ppt/slideLayouts/slideLayout12.xml"), Some(12));
        assert_eq!(extract_part_number("ppt/theme/theme.xml"), None);
        assert_eq!(extract_part_number("ppt/slideLayouts/_rels/slideLayout1.xml.rels"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"a:srgbClr"), b"srgbClr");
        assert_eq!(local_name(b"cSld"), b"cSld");
    }
}
