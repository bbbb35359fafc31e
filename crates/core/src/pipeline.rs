//! Staged orchestration of a deck generation run.
//!
//! A run walks a fixed sequence of stages. Each stage is a plain function of
//! the previous stages' outputs; the first failure ends the run and is
//! reported together with the stage it happened in. Nothing produced by a
//! failed run is handed back to the caller.

use crate::assemble::{assemble, DocumentWriter};
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::normalize::TextNormalizer;
use crate::segment;
use crate::style;
use crate::template::{BuiltinAnalyzer, Credentials, TemplateAnalyzer, TemplateFile};
use crate::types::{SlideUnit, StyledSlide, TemplateDescriptor};
use crate::understand::{normalize_units, MarkupUnderstanding, TextUnderstanding};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimum input text length, in characters.
pub const MIN_TEXT_CHARS: usize = 50;

/// Minimum API key length, in characters.
pub const MIN_API_KEY_CHARS: usize = 10;

/// The named steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    ValidateInputs,
    AnalyzeTemplate,
    UnderstandText,
    BuildDeck,
    ApplyStyle,
    AssembleDocument,
    FinalizeOutput,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::ValidateInputs,
        Stage::AnalyzeTemplate,
        Stage::UnderstandText,
        Stage::BuildDeck,
        Stage::ApplyStyle,
        Stage::AssembleDocument,
        Stage::FinalizeOutput,
    ];

    /// 0-based position of this stage in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::ValidateInputs => "ValidateInputs",
            Stage::AnalyzeTemplate => "AnalyzeTemplate",
            Stage::UnderstandText => "UnderstandText",
            Stage::BuildDeck => "BuildDeck",
            Stage::ApplyStyle => "ApplyStyle",
            Stage::AssembleDocument => "AssembleDocument",
            Stage::FinalizeOutput => "FinalizeOutput",
        }
    }

    /// Label suitable for a progress display.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::ValidateInputs => "Validating inputs",
            Stage::AnalyzeTemplate => "Analyzing template structure",
            Stage::UnderstandText => "Processing text",
            Stage::BuildDeck => "Generating slide structure",
            Stage::ApplyStyle => "Applying template styling",
            Stage::AssembleDocument => "Creating presentation",
            Stage::FinalizeOutput => "Preparing output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running(Stage),
    Completed,
    Failed { stage: Stage, reason: String },
}

/// Progress report emitted as each stage starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    /// 0-based stage index.
    pub index: usize,
    pub total: usize,
}

impl Progress {
    fn starting(stage: Stage) -> Self {
        Self {
            stage,
            index: stage.index(),
            total: Stage::ALL.len(),
        }
    }

    /// `(index + 1) / total`, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        (self.index + 1) as f64 / self.total as f64
    }

    /// Whole percentage, rounded down.
    pub fn percent(&self) -> u32 {
        ((self.index + 1) * 100 / self.total) as u32
    }
}

/// Receiver of progress reports.
pub trait ProgressSink {
    fn report(&mut self, progress: Progress);

    /// Called on every lifecycle transition of the run, ending with
    /// [`RunState::Completed`] or [`RunState::Failed`].
    fn state_changed(&mut self, _state: &RunState) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(Progress),
{
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Progress sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Shared flag that asks a run to stop at its next stage boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything one generation run needs from the caller.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub text: String,
    pub guidance: String,
    pub credentials: Credentials,
    /// Uploaded template. `None` uses the built-in template.
    pub template: Option<TemplateFile>,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            text: text.into(),
            guidance: String::new(),
            credentials,
            template: None,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = guidance.into();
        self
    }

    pub fn with_template(mut self, template: TemplateFile) -> Self {
        self.template = Some(template);
        self
    }
}

/// Check text and credential length. Fails on the first violation.
pub fn validate_inputs(request: &GenerationRequest) -> Result<()> {
    if request.text.chars().count() < MIN_TEXT_CHARS {
        return Err(Error::Validation(format!(
            "Text content is too short. Please provide at least {} characters.",
            MIN_TEXT_CHARS
        )));
    }

    if request.credentials.api_key.chars().count() < MIN_API_KEY_CHARS {
        return Err(Error::Validation("Invalid API key format.".to_string()));
    }

    if !request.credentials.matches_provider_format() {
        log::warn!(
            "API key does not look like a {} key. {}",
            request.credentials.provider,
            request.credentials.provider.key_format_hint()
        );
    }

    Ok(())
}

/// A run that stopped at a stage, with the reason.
#[derive(thiserror::Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineAbort {
    pub stage: Stage,
    pub source: Error,
}

/// The outputs of a completed run.
#[derive(Debug)]
pub struct Generated<D> {
    pub template: TemplateDescriptor,
    pub deck: Deck,
    pub slides: Vec<StyledSlide>,
    pub document: D,
}

/// Tunables for a [`Generator`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Pause before each stage. Off unless throttling is wanted.
    stage_delay: Option<Duration>,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` before each stage runs.
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn stage_delay(&self) -> Option<Duration> {
        self.stage_delay
    }
}

/// Bookkeeping for one run: lifecycle state, progress and cancellation.
struct PipelineRun<'a> {
    state: RunState,
    sink: &'a mut dyn ProgressSink,
    cancel: &'a CancelToken,
    delay: Option<Duration>,
}

impl<'a> PipelineRun<'a> {
    fn new(
        sink: &'a mut dyn ProgressSink,
        cancel: &'a CancelToken,
        delay: Option<Duration>,
    ) -> Self {
        Self {
            state: RunState::NotStarted,
            sink,
            cancel,
            delay,
        }
    }

    fn transition(&mut self, state: RunState) {
        log::trace!("Run state: {:?}", state);
        self.sink.state_changed(&state);
        self.state = state;
    }

    /// Move to `stage`, unless the run was cancelled in the meantime.
    fn enter(&mut self, stage: Stage) -> std::result::Result<(), PipelineAbort> {
        if self.cancel.is_cancelled() {
            return Err(self.fail(stage, Error::Cancelled));
        }

        log::debug!("Stage {}/{}: {}", stage.index() + 1, Stage::ALL.len(), stage);
        self.transition(RunState::Running(stage));
        self.sink.report(Progress::starting(stage));

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        Ok(())
    }

    /// Record the outcome of the running stage.
    fn check<T>(&mut self, stage: Stage, result: Result<T>) -> std::result::Result<T, PipelineAbort> {
        result.map_err(|source| self.fail(stage, source))
    }

    fn fail(&mut self, stage: Stage, source: Error) -> PipelineAbort {
        log::warn!("Generation failed at {}: {}", stage, source);
        self.transition(RunState::Failed {
            stage,
            reason: source.to_string(),
        });
        PipelineAbort { stage, source }
    }

    fn complete(&mut self) {
        self.transition(RunState::Completed);
    }
}

/// Runs the text-to-deck pipeline with pluggable capabilities.
pub struct Generator {
    understanding: Box<dyn TextUnderstanding>,
    analyzer: Box<dyn TemplateAnalyzer>,
    options: GeneratorOptions,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            understanding: Box::new(MarkupUnderstanding::new()),
            analyzer: Box::new(BuiltinAnalyzer),
            options: GeneratorOptions::default(),
        }
    }
}

impl Generator {
    /// Create a generator using markup segmentation and the built-in template analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_understanding(mut self, understanding: impl TextUnderstanding + 'static) -> Self {
        self.understanding = Box::new(understanding);
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl TemplateAnalyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every stage, writing the deck through `writer`.
    pub fn generate<W: DocumentWriter>(
        &self,
        request: &GenerationRequest,
        writer: W,
        progress: &mut dyn ProgressSink,
    ) -> std::result::Result<Generated<W::Document>, PipelineAbort> {
        self.generate_with_cancel(request, writer, progress, &CancelToken::new())
    }

    /// Like [`Generator::generate`], stopping at the next stage boundary
    /// once `cancel` is set. The writer is dropped when the run stops.
    pub fn generate_with_cancel<W: DocumentWriter>(
        &self,
        request: &GenerationRequest,
        mut writer: W,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> std::result::Result<Generated<W::Document>, PipelineAbort> {
        let mut run = PipelineRun::new(progress, cancel, self.options.stage_delay);
        log::info!(
            "Generating deck from {} characters of text",
            request.text.chars().count()
        );

        run.enter(Stage::ValidateInputs)?;
        run.check(Stage::ValidateInputs, validate_inputs(request))?;

        run.enter(Stage::AnalyzeTemplate)?;
        let template = run.check(Stage::AnalyzeTemplate, self.analyze_template(request))?;

        run.enter(Stage::UnderstandText)?;
        let units = run.check(Stage::UnderstandText, self.understand_text(request))?;

        run.enter(Stage::BuildDeck)?;
        let deck = run.check(Stage::BuildDeck, Deck::build(units))?;

        run.enter(Stage::ApplyStyle)?;
        let slides = run.check(Stage::ApplyStyle, style::bind(&deck, &template))?;

        run.enter(Stage::AssembleDocument)?;
        run.check(Stage::AssembleDocument, assemble(&slides, &mut writer))?;

        run.enter(Stage::FinalizeOutput)?;
        let document = run.check(Stage::FinalizeOutput, writer.finalize())?;

        run.complete();
        log::info!("Generated {} slides", deck.len());

        Ok(Generated {
            template,
            deck,
            slides,
            document,
        })
    }

    fn analyze_template(&self, request: &GenerationRequest) -> Result<TemplateDescriptor> {
        match &request.template {
            Some(file) => {
                file.validate()?;
                let template = self.analyzer.analyze(file)?;
                log::debug!(
                    "Template '{}': {} colors, font {}, {} layouts",
                    file.filename,
                    template.palette.len(),
                    template.font,
                    template.layouts.len()
                );
                Ok(template)
            }
            None => {
                log::debug!("No template supplied, using built-in template");
                Ok(TemplateDescriptor::default())
            }
        }
    }

    fn understand_text(&self, request: &GenerationRequest) -> Result<Vec<SlideUnit>> {
        let units = self
            .understanding
            .understand(&request.text, &request.guidance)
            .map_err(|e| match e {
                Error::Understanding(_) | Error::Cancelled => e,
                other => Error::Understanding(other.to_string()),
            })?;

        let units = normalize_units(units);
        if units.is_empty() {
            log::info!("Understanding produced no slides, segmenting by paragraph");
            let text = TextNormalizer::new().normalize(&request.text);
            return Ok(segment::fallback(&text));
        }

        Ok(units)
    }
}
