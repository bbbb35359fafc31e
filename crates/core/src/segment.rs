//! Segmentation of prose into slide units.
//!
//! The markup segmenter recognizes three heading ranks (`# `, `## `, `### `)
//! and bullet items (`- `, `* `). Text without any heading falls through to
//! the paragraph segmenter, which makes a generic title slide plus one
//! content slide per extra paragraph.

use crate::types::{SlideKind, SlideUnit};
use regex::Regex;
use std::sync::LazyLock;

/// Heading markers, longest first so `### ` is never read as `# `.
const HEADING_MARKERS: [(&str, SlideKind); 3] = [
    ("### ", SlideKind::Content),
    ("## ", SlideKind::Section),
    ("# ", SlideKind::Title),
];

/// Bullet markers. The marker and one following space are stripped.
const BULLET_MARKERS: [&str; 2] = ["- ", "* "];

/// Heading of the title slide the paragraph segmenter always emits.
pub const FALLBACK_TITLE: &str = "Presentation";

/// Paragraph boundary: a newline, optional blank-ish lines, another newline.
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// What a single trimmed input line means to the segmenter.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading(SlideKind, &'a str),
    Bullet(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    for (marker, kind) in HEADING_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            let heading = rest.trim();
            if !heading.is_empty() {
                return Line::Heading(kind, heading);
            }
        }
    }

    for marker in BULLET_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return Line::Bullet(rest.trim());
        }
    }

    Line::Text(line)
}

/// Split text into slide units using heading markup.
///
/// Never fails; returns an empty vector when the text has no heading.
/// Body lines seen before the first heading are dropped.
pub fn segment(text: &str) -> Vec<SlideUnit> {
    let mut slides = Vec::new();
    let mut open: Option<SlideUnit> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            Line::Heading(kind, heading) => {
                if let Some(done) = open.take() {
                    slides.push(done);
                }
                open = Some(SlideUnit::new(kind, heading));
            }
            Line::Bullet(item) => match open.as_mut() {
                Some(slide) if !item.is_empty() => slide.push_bullet(item),
                Some(_) => {}
                None => log::trace!("Dropping bullet before first heading: {:?}", item),
            },
            Line::Text(body) => match open.as_mut() {
                Some(slide) => slide.push_line(body),
                None => log::trace!("Dropping text before first heading: {:?}", body),
            },
        }
    }

    if let Some(done) = open {
        slides.push(done);
    }

    slides
}

/// Split text without markup into slides by blank-line-separated paragraphs.
///
/// The first paragraph is represented by the generic title slide and is not
/// repeated. Every further paragraph becomes a content slide headed
/// `Slide N`, where N is that slide's position in the resulting deck.
pub fn fallback(text: &str) -> Vec<SlideUnit> {
    let paragraphs: Vec<&str> = PARAGRAPH_BREAK_REGEX
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut slides = vec![SlideUnit::new(SlideKind::Title, FALLBACK_TITLE)];

    for paragraph in paragraphs.iter().skip(1) {
        let number = slides.len() + 1;
        let mut slide = SlideUnit::new(SlideKind::Content, format!("Slide {}", number));
        slide.push_line(*paragraph);
        slides.push(slide);
    }

    slides
}

/// Markup segmentation with the paragraph fallback applied when it is empty.
pub fn segment_or_fallback(text: &str) -> Vec<SlideUnit> {
    let slides = segment(text);
    if !slides.is_empty() {
        return slides;
    }

    log::debug!("No heading markup found, segmenting by paragraph");
    fallback(text)
}
