//! Text normalization applied before segmentation.
//!
//! Unifies line endings, composes Unicode to NFC and collapses runs of
//! horizontal whitespace. Line and paragraph structure is left untouched so
//! the segmenters see the same blank lines the author wrote.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple spaces/tabs into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Byte order mark that editors sometimes leave at the start of a file.
const BOM: char = '\u{feff}';

/// Text normalizer for raw prose input.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to collapse whitespace runs inside each line.
    collapse_whitespace: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
        }
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to collapse whitespace runs inside lines.
    pub fn with_collapse_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }

    /// Normalize a whole input text.
    ///
    /// - Converts `\r\n` and lone `\r` to `\n`
    /// - Drops a leading byte order mark
    /// - Composes to Unicode NFC
    /// - Collapses space/tab runs to a single space (if enabled)
    pub fn normalize(&self, text: &str) -> String {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text: String = text.nfc().collect();

        if !self.collapse_whitespace {
            return text;
        }

        text.split('\n')
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
