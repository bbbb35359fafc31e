//! Plain-text outline output.
//!
//! Renders each slide as its text blocks, one per line, with slides
//! separated by a blank line. Styling is dropped.

use crate::assemble::{DocumentHandle, DocumentWriter, Region, TextStyle};
use crate::error::{Error, Result};
use crate::types::Color;

/// Writer that produces a plain-text outline of the deck.
#[derive(Debug, Clone, Default)]
pub struct OutlineWriter {
    slides: Vec<Vec<String>>,
    /// Prefix every slide with its number (`[1]`).
    numbered: bool,
}

impl OutlineWriter {
    /// Create a new outline writer without slide numbers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to prefix each slide with its number.
    pub fn with_numbers(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    fn current(&mut self) -> Result<&mut Vec<String>> {
        self.slides
            .last_mut()
            .ok_or_else(|| Error::Writer("no slide has been started".to_string()))
    }
}

impl DocumentWriter for OutlineWriter {
    type Document = OutlineDocument;

    fn start_slide(&mut self) -> Result<()> {
        self.slides.push(Vec::new());
        Ok(())
    }

    fn place_text(&mut self, _region: Region, text: &str, _style: &TextStyle) -> Result<()> {
        self.current()?.push(text.to_string());
        Ok(())
    }

    fn set_background(&mut self, _color: &Color) -> Result<()> {
        self.current().map(|_| ())
    }

    fn finalize(self) -> Result<OutlineDocument> {
        let numbered = self.numbered;
        let blocks: Vec<String> = self
            .slides
            .into_iter()
            .enumerate()
            .map(|(index, texts)| {
                let body = texts.join("\n");
                if numbered {
                    format!("[{}] {}", index + 1, body)
                } else {
                    body
                }
            })
            .collect();

        let mut text = blocks.join("\n\n");
        if !text.is_empty() {
            text.push('\n');
        }

        Ok(OutlineDocument { text })
    }
}

/// A finished plain-text outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineDocument {
    text: String,
}

impl OutlineDocument {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DocumentHandle for OutlineDocument {
    fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}
