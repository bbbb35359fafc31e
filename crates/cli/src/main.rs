//! CLI tool for turning prose into a styled slide deck.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deckgen_core::{
    Credentials, DocumentHandle, DocumentWriter, Generated, GenerationRequest, Generator,
    GeneratorOptions, OutlineWriter, Progress, Provider, TemplateFile,
};
use deckgen_pptx::{PptxWriter, ThemeAnalyzer};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// PowerPoint package
    Pptx,
    /// Plain-text outline
    Outline,
}

impl Format {
    fn extension(&self) -> &'static str {
        match self {
            Format::Pptx => "pptx",
            Format::Outline => "txt",
        }
    }
}

/// Generate a slide deck from a text file.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input text file
    input: PathBuf,

    /// Template to take colors and fonts from (.pptx or .potx)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Free-form guidance for the text-understanding step
    #[arg(short, long, default_value = "")]
    guidance: String,

    /// AI provider the API key belongs to
    #[arg(long, default_value = "openai")]
    provider: String,

    /// API key for the provider
    #[arg(long, env = "DECKGEN_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Output file (default: input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pptx")]
    format: Format,

    /// Print the styled deck as JSON instead of previews
    #[arg(long)]
    json: bool,

    /// Pause between stages, in milliseconds
    #[arg(long)]
    stage_delay_ms: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let request = build_request(&args)?;

    let mut generator = Generator::new();
    if let Some(template) = &request.template {
        log::debug!("Analyzing template {:?}", template);
        generator = generator.with_analyzer(ThemeAnalyzer::new());
    }
    if let Some(ms) = args.stage_delay_ms {
        generator =
            generator.with_options(GeneratorOptions::new().with_stage_delay(Duration::from_millis(ms)));
    }

    let output_path = get_output_path(&args.input, args.output.as_ref(), args.format);
    log::debug!("Writing {:?} output to {}", args.format, output_path.display());

    match args.format {
        Format::Pptx => {
            let title = args
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Generated Presentation");
            let writer = PptxWriter::new().with_title(title);
            run(&generator, &request, writer, &args, &output_path)
        }
        Format::Outline => run(
            &generator,
            &request,
            OutlineWriter::new().with_numbers(true),
            &args,
            &output_path,
        ),
    }
}

/// Read the input files and assemble the generation request.
fn build_request(args: &Args) -> Result<GenerationRequest> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let provider: Provider = args
        .provider
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut request = GenerationRequest::new(text, Credentials::new(provider, args.api_key.as_str()))
        .with_guidance(args.guidance.as_str());

    if let Some(path) = &args.template {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("template");
        request = request.with_template(TemplateFile::new(filename, bytes));
    }

    Ok(request)
}

/// Run the pipeline with one writer, then report and save the result.
fn run<W: DocumentWriter>(
    generator: &Generator,
    request: &GenerationRequest,
    writer: W,
    args: &Args,
    output_path: &Path,
) -> Result<()> {
    let verbose = args.verbose;
    let mut report = |progress: Progress| {
        if verbose {
            eprintln!(
                "[{:>3}%] {}",
                progress.percent(),
                progress.stage.description()
            );
        }
    };

    let generated = generator.generate(request, writer, &mut report)?;

    print_summary(&generated, args.json)?;

    write_output(output_path, generated.document.as_bytes())?;
    log::info!("Written to: {}", output_path.display());

    Ok(())
}

/// Print the styled deck as JSON, or one preview line per slide.
fn print_summary<D>(generated: &Generated<D>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&generated.slides)?);
        return Ok(());
    }

    let previews = generated.deck.previews();

    println!(
        "{} slides, font {}",
        generated.deck.len(),
        generated.template.font
    );
    for preview in &previews {
        if preview.excerpt.is_empty() {
            println!("{:>3}. {}", preview.position, preview.heading);
        } else {
            println!(
                "{:>3}. {} | {}",
                preview.position, preview.heading, preview.excerpt
            );
        }
    }

    Ok(())
}

/// Determine the output path for the generated document.
fn get_output_path(input_path: &Path, output: Option<&PathBuf>, format: Format) -> PathBuf {
    if let Some(path) = output {
        return path.clone();
    }

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, format.extension());

    match input_path.parent() {
        Some(parent) => parent.join(output_filename),
        None => PathBuf::from(output_filename),
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
