//! Domain types for representing slides before and after styling.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The structural role of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// Opened by a rank-1 heading (`# `).
    Title,
    /// Opened by a rank-2 heading (`## `).
    Section,
    /// Opened by a rank-3 heading (`### `).
    Content,
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlideKind::Title => "title",
            SlideKind::Section => "section",
            SlideKind::Content => "content",
        };
        f.write_str(name)
    }
}

/// One line of slide body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BodyLineRepr")]
pub struct BodyLine {
    /// The line text, with any bullet marker already stripped.
    pub text: String,

    /// Whether the line was written as a bullet item.
    pub bullet: bool,
}

impl BodyLine {
    /// Create a plain (non-bullet) line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullet: false,
        }
    }

    /// Create a bullet line.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullet: true,
        }
    }
}

impl From<&str> for BodyLine {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// Accepts either a bare string or a `{ "text": .., "bullet": .. }` object,
/// so model output can list body lines the short way.
#[derive(Deserialize)]
#[serde(untagged)]
enum BodyLineRepr {
    Plain(String),
    Full {
        text: String,
        #[serde(default)]
        bullet: bool,
    },
}

impl From<BodyLineRepr> for BodyLine {
    fn from(repr: BodyLineRepr) -> Self {
        match repr {
            BodyLineRepr::Plain(text) => BodyLine::plain(text),
            BodyLineRepr::Full { text, bullet } => BodyLine { text, bullet },
        }
    }
}

/// One slide's structural content prior to styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideUnit {
    /// Structural role of the slide.
    pub kind: SlideKind,

    /// Slide heading. Never empty in segmenter output.
    pub heading: String,

    /// Body lines in reading order.
    #[serde(default)]
    pub body: Vec<BodyLine>,
}

impl SlideUnit {
    /// Create a slide unit with an empty body.
    pub fn new(kind: SlideKind, heading: impl Into<String>) -> Self {
        Self {
            kind,
            heading: heading.into(),
            body: Vec::new(),
        }
    }

    /// Append a plain body line.
    pub fn push_line(&mut self, text: impl Into<String>) {
        self.body.push(BodyLine::plain(text));
    }

    /// Append a bullet body line.
    pub fn push_bullet(&mut self, text: impl Into<String>) {
        self.body.push(BodyLine::bullet(text));
    }

    /// Body text without bullet provenance.
    pub fn body_texts(&self) -> Vec<&str> {
        self.body.iter().map(|l| l.text.as_str()).collect()
    }
}

/// A slide unit with its 1-based position in a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based position, contiguous within the deck.
    pub position: usize,

    #[serde(flatten)]
    pub unit: SlideUnit,
}

/// An RGB color, stored as six uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(value.to_string()));
        }

        Ok(Self(hex.to_ascii_uppercase()))
    }

    /// The six hex digits without a leading `#`, as OOXML wants them.
    pub fn hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Built-in palette used when no template file is supplied.
const DEFAULT_PALETTE: [&str; 4] = ["1F4E79", "70AD47", "FFC000", "C5504B"];

/// Built-in typeface used when no template file is supplied.
pub const DEFAULT_FONT: &str = "Calibri";

/// Layout archetypes reported for the built-in template.
const DEFAULT_LAYOUTS: [&str; 5] = [
    "Title Slide",
    "Title and Content",
    "Section Header",
    "Two Content",
    "Comparison",
];

/// The extracted visual identity of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Ordered palette. Styling needs at least two entries.
    pub palette: Vec<Color>,

    /// Typeface applied to every text block.
    pub font: String,

    /// Named layout archetypes the template offers (informational).
    #[serde(default)]
    pub layouts: Vec<String>,
}

impl TemplateDescriptor {
    /// Create a descriptor with no layouts.
    pub fn new(palette: Vec<Color>, font: impl Into<String>) -> Self {
        Self {
            palette,
            font: font.into(),
            layouts: Vec::new(),
        }
    }

    /// Set the layout names.
    pub fn with_layouts<I, S>(mut self, layouts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layouts = layouts.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE
                .iter()
                .map(|hex| Color(hex.to_string()))
                .collect(),
            font: DEFAULT_FONT.to_string(),
            layouts: DEFAULT_LAYOUTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Visual attributes bound to a slide from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideStyle {
    pub background: Color,
    pub title_color: Color,
    pub body_color: Color,
    pub font: String,
}

/// A positioned slide with its template-derived style. Render-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSlide {
    #[serde(flatten)]
    pub slide: Slide,

    pub style: SlideStyle,
}

impl StyledSlide {
    pub fn kind(&self) -> SlideKind {
        self.slide.unit.kind
    }

    pub fn heading(&self) -> &str {
        &self.slide.unit.heading
    }

    pub fn body(&self) -> &[BodyLine] {
        &self.slide.unit.body
    }
}
