//! Deck building: numbering slide units into an ordered deck.

use crate::error::{Error, Result};
use crate::types::{Slide, SlideUnit};
use serde::{Deserialize, Serialize};

/// Maximum excerpt length shown in a slide preview.
const PREVIEW_CHARS: usize = 100;

/// Number of body lines joined into a preview excerpt.
const PREVIEW_LINES: usize = 2;

/// An ordered, numbered, non-empty sequence of slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DeckRepr")]
pub struct Deck {
    slides: Vec<Slide>,
}

/// Wire form of a deck, checked before it becomes a [`Deck`].
#[derive(Deserialize)]
struct DeckRepr {
    slides: Vec<Slide>,
}

impl TryFrom<DeckRepr> for Deck {
    type Error = Error;

    fn try_from(repr: DeckRepr) -> Result<Self> {
        if repr.slides.is_empty() {
            return Err(Error::EmptyDeck);
        }

        for (index, slide) in repr.slides.iter().enumerate() {
            if slide.position != index + 1 {
                return Err(Error::Validation(format!(
                    "Slide at index {} has position {}, expected {}",
                    index,
                    slide.position,
                    index + 1
                )));
            }
        }

        Ok(Self {
            slides: repr.slides,
        })
    }
}

impl Deck {
    /// Number each unit by its order, starting at 1.
    ///
    /// Fails with [`Error::EmptyDeck`] when given no units.
    pub fn build(units: Vec<SlideUnit>) -> Result<Self> {
        if units.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let slides = units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| Slide {
                position: index + 1,
                unit,
            })
            .collect();

        Ok(Self { slides })
    }

    /// Slides in deck order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Short per-slide summaries for listing a deck.
    pub fn previews(&self) -> Vec<SlidePreview> {
        self.slides.iter().map(SlidePreview::from_slide).collect()
    }
}

/// A one-line summary of a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePreview {
    pub position: usize,
    pub heading: String,
    pub excerpt: String,
}

impl SlidePreview {
    fn from_slide(slide: &Slide) -> Self {
        let body = slide.unit.body_texts();
        let full_len: usize = body.join(" ").chars().count();

        let mut excerpt: String = body
            .iter()
            .take(PREVIEW_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(PREVIEW_CHARS)
            .collect();

        if full_len > PREVIEW_CHARS {
            excerpt.push_str("...");
        }

        Self {
            position: slide.position,
            heading: slide.unit.heading.clone(),
            excerpt,
        }
    }
}
