//! Core pipeline for turning prose into a styled slide deck.
//!
//! Text is segmented into slide units, numbered into a deck, styled from a
//! template and assembled through a pluggable document writer, all driven
//! by a staged [`Generator`].

pub mod assemble;
pub mod deck;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod pipeline;
pub mod segment;
pub mod style;
pub mod template;
pub mod types;
pub mod understand;

pub use assemble::{
    assemble, assemble_document, Align, Anchor, DocumentHandle, DocumentWriter, Region, TextStyle,
};
pub use deck::{Deck, SlidePreview};
pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use outline::{OutlineDocument, OutlineWriter};
pub use pipeline::{
    CancelToken, Generated, GenerationRequest, Generator, GeneratorOptions, NoProgress,
    PipelineAbort, Progress, ProgressSink, RunState, Stage,
};
pub use template::{BuiltinAnalyzer, Credentials, Provider, TemplateAnalyzer, TemplateFile};
pub use types::{
    BodyLine, Color, Slide, SlideKind, SlideStyle, SlideUnit, StyledSlide, TemplateDescriptor,
};
pub use understand::{MarkupUnderstanding, TextUnderstanding};
