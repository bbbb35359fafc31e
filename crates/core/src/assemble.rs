//! Document assembly: walking styled slides and driving a document writer.
//!
//! The writer is a capability supplied by the caller. This module decides
//! what text goes where; the writer decides how that is serialized.

use crate::error::Result;
use crate::types::{Color, SlideKind, StyledSlide};
use serde::{Deserialize, Serialize};

/// Glyph placed before bullet-sourced body lines on content slides.
pub const BULLET_GLYPH: char = '\u{2022}';

/// A rectangle on the slide, in inches from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Slide regions for each kind of text block (10 x 7.5 inch slide).
pub mod regions {
    use super::Region;

    /// Large heading in the upper middle of a title slide.
    pub const TITLE_HEADING: Region = Region::new(1.0, 2.5, 8.0, 2.0);
    /// Subtitle line under a title slide heading.
    pub const TITLE_BODY: Region = Region::new(1.0, 4.5, 8.0, 1.0);
    /// Heading in the vertical middle of a section slide.
    pub const SECTION_HEADING: Region = Region::new(1.0, 3.0, 8.0, 1.5);
    /// Heading along the top of a content slide.
    pub const CONTENT_HEADING: Region = Region::new(0.5, 0.5, 9.0, 1.0);
    /// Body area filling the rest of a content slide.
    pub const CONTENT_BODY: Region = Region::new(0.5, 1.5, 9.0, 5.0);
}

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

/// Vertical anchoring of a text block inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Middle,
}

/// How a text block is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub size: u32,
    pub bold: bool,
    pub color: Color,
    pub font: String,
    pub align: Align,
    pub anchor: Anchor,
}

/// A finished document that can be turned into bytes.
pub trait DocumentHandle {
    /// The serialized document.
    fn as_bytes(&self) -> &[u8];
}

/// Capability that turns slide operations into a concrete document.
///
/// Operations arrive in slide order: `start_slide`, then zero or more
/// `place_text`, then `set_background`. `finalize` is called once at the end.
pub trait DocumentWriter {
    /// The finished document type.
    type Document: DocumentHandle;

    /// Begin a new, empty slide.
    fn start_slide(&mut self) -> Result<()>;

    /// Place a text block on the current slide. `\n` separates lines.
    fn place_text(&mut self, region: Region, text: &str, style: &TextStyle) -> Result<()>;

    /// Set the background color of the current slide.
    fn set_background(&mut self, color: &Color) -> Result<()>;

    /// Finish the document.
    fn finalize(self) -> Result<Self::Document>
    where
        Self: Sized;
}

/// Emit every styled slide through the writer. Returns the slide count.
pub fn assemble<W: DocumentWriter>(slides: &[StyledSlide], writer: &mut W) -> Result<usize> {
    for slide in slides {
        writer.start_slide()?;

        match slide.kind() {
            SlideKind::Title => emit_title(slide, writer)?,
            SlideKind::Section => emit_section(slide, writer)?,
            SlideKind::Content => emit_content(slide, writer)?,
        }

        writer.set_background(&slide.style.background)?;
        log::trace!("Assembled slide {} ({})", slide.slide.position, slide.kind());
    }

    Ok(slides.len())
}

/// Assemble the slides and finalize the writer into a document.
pub fn assemble_document<W: DocumentWriter>(
    slides: &[StyledSlide],
    mut writer: W,
) -> Result<W::Document> {
    assemble(slides, &mut writer)?;
    writer.finalize()
}

fn heading_style(slide: &StyledSlide, size: u32, align: Align) -> TextStyle {
    TextStyle {
        size,
        bold: true,
        color: slide.style.title_color.clone(),
        font: slide.style.font.clone(),
        align,
        anchor: Anchor::Middle,
    }
}

fn body_style(slide: &StyledSlide, size: u32, align: Align, anchor: Anchor) -> TextStyle {
    TextStyle {
        size,
        bold: false,
        color: slide.style.body_color.clone(),
        font: slide.style.font.clone(),
        align,
        anchor,
    }
}

fn emit_title<W: DocumentWriter>(slide: &StyledSlide, writer: &mut W) -> Result<()> {
    writer.place_text(
        regions::TITLE_HEADING,
        slide.heading(),
        &heading_style(slide, 36, Align::Center),
    )?;

    if !slide.body().is_empty() {
        let subtitle = slide.slide.unit.body_texts().join(" ");
        writer.place_text(
            regions::TITLE_BODY,
            &subtitle,
            &body_style(slide, 18, Align::Center, Anchor::Middle),
        )?;
    }

    Ok(())
}

fn emit_section<W: DocumentWriter>(slide: &StyledSlide, writer: &mut W) -> Result<()> {
    writer.place_text(
        regions::SECTION_HEADING,
        slide.heading(),
        &heading_style(slide, 32, Align::Center),
    )
}

fn emit_content<W: DocumentWriter>(slide: &StyledSlide, writer: &mut W) -> Result<()> {
    writer.place_text(
        regions::CONTENT_HEADING,
        slide.heading(),
        &heading_style(slide, 24, Align::Left),
    )?;

    if !slide.body().is_empty() {
        let text = slide
            .body()
            .iter()
            .map(|line| {
                if line.bullet {
                    format!("{} {}", BULLET_GLYPH, line.text)
                } else {
                    line.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        writer.place_text(
            regions::CONTENT_BODY,
            &text,
            &body_style(slide, 16, Align::Left, Anchor::Top),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::error::Error;
    use crate::style::bind;
    use crate::types::{SlideUnit, TemplateDescriptor};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Start,
        Text(Region, String, TextStyle),
        Background(Color),
    }

    #[derive(Default)]
    struct RecordingWriter {
        ops: Vec<Op>,
    }

    struct Recorded(Vec<Op>);

    impl DocumentHandle for Recorded {
        fn as_bytes(&self) -> &[u8] {
            &[]
        }
    }

    impl DocumentWriter for RecordingWriter {
        type Document = Recorded;

        fn start_slide(&mut self) -> Result<()> {
            self.ops.push(Op::Start);
            Ok(())
        }

        fn place_text(&mut self, region: Region, text: &str, style: &TextStyle) -> Result<()> {
            self.ops.push(Op::Text(region, text.to_string(), style.clone()));
            Ok(())
        }

        fn set_background(&mut self, color: &Color) -> Result<()> {
            self.ops.push(Op::Background(color.clone()));
            Ok(())
        }

        fn finalize(self) -> Result<Recorded> {
            Ok(Recorded(self.ops))
        }
    }

    fn styled(units: Vec<SlideUnit>) -> Vec<StyledSlide> {
        let deck = Deck::build(units).unwrap();
        bind(&deck, &TemplateDescriptor::default()).unwrap()
    }

    fn texts(ops: &[Op]) -> Vec<(Region, &str)> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Text(region, text, _) => Some((*region, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_slide_joins_body_with_spaces() {
        let mut title = SlideUnit::new(SlideKind::Title, "Hello");
        title.push_line("Some body text");
        title.push_bullet("point one");

        let Recorded(ops) = assemble_document(&styled(vec![title]), RecordingWriter::default()).unwrap();

        assert_eq!(ops.first(), Some(&Op::Start));
        assert_eq!(
            texts(&ops),
            vec![
                (regions::TITLE_HEADING, "Hello"),
                (regions::TITLE_BODY, "Some body text point one"),
            ]
        );
        match &ops[1] {
            Op::Text(_, _, style) => {
                assert_eq!(style.size, 36);
                assert!(style.bold);
                assert_eq!(style.align, Align::Center);
                assert_eq!(style.color.to_string(), "#70AD47");
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_title_without_body_has_one_block() {
        let Recorded(ops) = assemble_document(
            &styled(vec![SlideUnit::new(SlideKind::Title, "Only")]),
            RecordingWriter::default(),
        )
        .unwrap();
        assert_eq!(texts(&ops).len(), 1);
    }

    #[test]
    fn test_section_ignores_body() {
        let mut section = SlideUnit::new(SlideKind::Section, "Part Two");
        section.push_line("hidden");

        let Recorded(ops) = assemble_document(&styled(vec![section]), RecordingWriter::default()).unwrap();
        assert_eq!(texts(&ops), vec![(regions::SECTION_HEADING, "Part Two")]);
    }

    #[test]
    fn test_content_marks_bullets_and_breaks_lines() {
        let mut content = SlideUnit::new(SlideKind::Content, "Benefits");
        content.push_line("Overview");
        content.push_bullet("Efficiency");
        content.push_bullet("Automation");

        let Recorded(ops) = assemble_document(&styled(vec![content]), RecordingWriter::default()).unwrap();
        let blocks = texts(&ops);

        assert_eq!(blocks[0], (regions::CONTENT_HEADING, "Benefits"));
        assert_eq!(
            blocks[1],
            (regions::CONTENT_BODY, "Overview\n\u{2022} Efficiency\n\u{2022} Automation")
        );
        match &ops[2] {
            Op::Text(_, _, style) => {
                assert_eq!(style.anchor, Anchor::Top);
                assert_eq!(style.color.to_string(), "#333333");
                assert!(!style.bold);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_background_follows_text_blocks() {
        let slides = styled(vec![
            SlideUnit::new(SlideKind::Title, "A"),
            SlideUnit::new(SlideKind::Content, "B"),
        ]);
        let Recorded(ops) = assemble_document(&slides, RecordingWriter::default()).unwrap();

        let background = Op::Background(Color::parse("#1F4E79").unwrap());
        assert_eq!(
            ops,
            vec![
                Op::Start,
                ops[1].clone(),
                background.clone(),
                Op::Start,
                ops[4].clone(),
                background,
            ]
        );
    }

    #[test]
    fn test_writer_error_propagates() {
        struct Broken;

        impl DocumentWriter for Broken {
            type Document = Recorded;

            fn start_slide(&mut self) -> Result<()> {
                Err(Error::Writer("disk full".to_string()))
            }

            fn place_text(&mut self, _: Region, _: &str, _: &TextStyle) -> Result<()> {
                Ok(())
            }

            fn set_background(&mut self, _: &Color) -> Result<()> {
                Ok(())
            }

            fn finalize(self) -> Result<Recorded> {
                Ok(Recorded(Vec::new()))
            }
        }

        let slides = styled(vec![SlideUnit::new(SlideKind::Title, "A")]);
        assert!(matches!(assemble(&slides, &mut Broken), Err(Error::Writer(_))));
    }
}
