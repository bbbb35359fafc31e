//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning text into a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Input text or credential failed the input gate.
    #[error("{0}")]
    Validation(String),

    /// The provider name is not one we know about.
    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    /// The template file is malformed or unacceptable.
    #[error("Template error: {0}")]
    Template(String),

    /// The template palette cannot supply background and title colors.
    #[error("Template palette needs at least 2 colors, found {found}")]
    InsufficientPalette { found: usize },

    /// A color value could not be parsed.
    #[error("Invalid color value: {0}")]
    InvalidColor(String),

    /// A deck was requested from zero slide units.
    #[error("Cannot build a deck from zero slides")]
    EmptyDeck,

    /// The text-understanding capability failed.
    #[error("Text understanding failed: {0}")]
    Understanding(String),

    /// The document writer failed.
    #[error("Document writer error: {0}")]
    Writer(String),

    /// The run was cancelled at a stage boundary.
    #[error("Generation was cancelled")]
    Cancelled,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}
