//! PPTX (Office Open XML) backend for deck generation.
//!
//! Analyzes .pptx/.potx templates for their theme and writes generated
//! decks as .pptx packages. Both are ZIP archives of XML parts.

pub mod analyzer;
pub mod writer;

pub use analyzer::ThemeAnalyzer;
pub use writer::{PptxDocument, PptxWriter};
