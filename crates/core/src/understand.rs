//! The pluggable text-understanding step.
//!
//! Anything that turns `(text, guidance)` into slide units can drive the
//! pipeline. The built-in [`MarkupUnderstanding`] uses the local segmenters;
//! a model-backed implementation would parse its reply with
//! [`units_from_json`] and rely on [`normalize_units`] for cleanup.

use crate::error::{Error, Result};
use crate::normalize::TextNormalizer;
use crate::segment;
use crate::types::{BodyLine, SlideUnit};

/// Capability that turns prose into slide units.
pub trait TextUnderstanding {
    fn understand(&self, text: &str, guidance: &str) -> Result<Vec<SlideUnit>>;
}

impl<F> TextUnderstanding for F
where
    F: Fn(&str, &str) -> Result<Vec<SlideUnit>>,
{
    fn understand(&self, text: &str, guidance: &str) -> Result<Vec<SlideUnit>> {
        self(text, guidance)
    }
}

/// Local, deterministic understanding based on heading markup.
#[derive(Debug, Clone, Default)]
pub struct MarkupUnderstanding {
    normalizer: TextNormalizer,
}

impl MarkupUnderstanding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom text normalizer.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

impl TextUnderstanding for MarkupUnderstanding {
    fn understand(&self, text: &str, guidance: &str) -> Result<Vec<SlideUnit>> {
        if !guidance.trim().is_empty() {
            log::debug!("Markup segmentation ignores guidance: {:?}", guidance);
        }

        let text = self.normalizer.normalize(text);
        Ok(segment::segment_or_fallback(&text))
    }
}

/// Parse a JSON array of slide units, as a model would return it.
pub fn units_from_json(json: &str) -> Result<Vec<SlideUnit>> {
    serde_json::from_str(json)
        .map_err(|e| Error::Understanding(format!("Malformed slide JSON: {}", e)))
}

/// Bring capability output into segmenter shape.
///
/// Trims headings and body lines, drops empty body lines and drops units
/// whose heading is empty.
pub fn normalize_units(units: Vec<SlideUnit>) -> Vec<SlideUnit> {
    let total = units.len();

    let normalized: Vec<SlideUnit> = units
        .into_iter()
        .filter_map(|unit| {
            let heading = unit.heading.trim();
            if heading.is_empty() {
                return None;
            }

            let body = unit
                .body
                .into_iter()
                .filter_map(|line| {
                    let text = line.text.trim();
                    (!text.is_empty()).then(|| BodyLine {
                        text: text.to_string(),
                        bullet: line.bullet,
                    })
                })
                .collect();

            Some(SlideUnit {
                kind: unit.kind,
                heading: heading.to_string(),
                body,
            })
        })
        .collect();

    if normalized.len() < total {
        log::warn!(
            "Dropped {} slide(s) with empty headings from understanding output",
            total - normalized.len()
        );
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SlideKind;

    #[test]
    fn test_markup_understanding_normalizes_first() {
        let units = MarkupUnderstanding::new()
            .understand("# Hello\r\n\r\n-   spaced    out", "")
            .unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].body, vec![BodyLine::bullet("spaced out")]);
    }

    #[test]
    fn test_markup_understanding_falls_back() {
        let units = MarkupUnderstanding::new()
            .understand("Para one.\r\n\r\nPara two.", "make it short")
            .unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[1].heading, "Slide 2");
    }

    #[test]
    fn test_closure_understanding() {
        let fixed = |_: &str, _: &str| -> Result<Vec<SlideUnit>> {
            Ok(vec![SlideUnit::new(SlideKind::Title, "Fixed")])
        };
        let units = fixed.understand("anything", "").unwrap();
        assert_eq!(units[0].heading, "Fixed");
    }

    #[test]
    fn test_units_from_json() {
        let json = r#"[
            {"kind": "title", "heading": "AI"},
            {"kind": "content", "heading": "Uses", "body": [{"text": "Health", "bullet": true}]}
        ]"#;
        let units = units_from_json(json).unwrap();
        assert_eq!(units.len(), 2);
        assert!(units[1].body[0].bullet);

        assert!(matches!(
            units_from_json("{not json"),
            Err(Error::Understanding(_))
        ));
    }

    #[test]
    fn test_normalize_units() {
        let mut keep = SlideUnit::new(SlideKind::Content, "  Uses  ");
        keep.push_line("  Health ");
        keep.push_line("   ");
        keep.push_bullet("Finance");

        let units = normalize_units(vec![SlideUnit::new(SlideKind::Section, "   "), keep]);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].heading, "Uses");
        assert_eq!(
            units[0].body,
            vec![BodyLine::plain("Health"), BodyLine::bullet("Finance")]
        );
    }
}
