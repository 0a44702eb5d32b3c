use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde_json::Value;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{info, warn};
use walkdir::WalkDir;

use docsum::analysis::{AnalysisRequest, Analyzer};
use docsum::config::AppConfig;
use docsum::document::{self, RawDocument};
use docsum::logging;
use docsum::nlp::enhancement::default_backend_names;
use docsum::nlp::language::{detect_language, Language};
use docsum::projection::FieldFilter;

#[derive(Parser)]
#[command(name = "docsum", about = "Extractive summaries and text analysis for English and Arabic documents")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Probe the built-in enhancement backends when the config names none
    #[arg(long, global = true)]
    enhance: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Default)]
struct InputArgs {
    /// Read the document from a file (txt, md, html, pdf)
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Use this text as the document
    #[arg(short, long)]
    text: Option<String>,
    /// Treat the input as HTML
    #[arg(long)]
    html: bool,
    /// Language tag (en, ar); detected when omitted
    #[arg(short, long)]
    lang: Option<String>,
    /// Number of summary sentences
    #[arg(short = 'n', long)]
    sentences: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis record as JSON
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Summarize through the configured AI service
        #[arg(long)]
        ai: bool,
        /// Only these fields (comma separated); `ok` is always kept
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,
        /// Drop these fields (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
    },
    /// Print only the extractive summary
    Summarize {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Analyze every supported file under a directory
    Batch {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(short = 'n', long)]
        sentences: Option<usize>,
        #[arg(long)]
        ai: bool,
    },
    /// Show which enhancement backends and services are available
    Capabilities,
}

fn load_config(path: Option<&Path>, enhance: bool) -> Result<AppConfig> {
    let mut config = AppConfig::load(path)?;
    if enhance && config.enhancements.is_empty() {
        config.enhancements = default_backend_names();
    }
    Ok(config)
}

fn read_input(input: &InputArgs) -> Result<RawDocument> {
    let raw = match (&input.file, &input.text) {
        (Some(path), _) => document::read_document(path)?,
        (None, Some(text)) => RawDocument {
            content: text.clone(),
            is_html: false,
        },
        (None, None) => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("reading document from stdin")?;
            RawDocument {
                content,
                is_html: false,
            }
        }
    };
    Ok(RawDocument {
        is_html: raw.is_html || input.html,
        ..raw
    })
}

/// Map a `--lang` tag onto a supported language. Unrecognized tags are
/// summarized as English.
fn parse_language(tag: Option<&str>) -> Option<Language> {
    let tag = tag?;
    let language = Language::from_tag(tag);
    if language.code() != tag.trim().to_lowercase() {
        warn!(tag, using = %language, "unrecognized language tag");
    }
    Some(language)
}

fn build_filter(include: Vec<String>, exclude: Vec<String>) -> Option<FieldFilter> {
    match (include.is_empty(), exclude.is_empty()) {
        (true, true) => None,
        (false, true) => Some(FieldFilter::include(include)),
        (true, false) => Some(FieldFilter::exclude(exclude)),
        (false, false) => Some(FieldFilter::Spec {
            include: Some(include),
            exclude: Some(exclude),
        }),
    }
}

fn request_for(raw: RawDocument, input: &InputArgs) -> AnalysisRequest {
    let mut request = AnalysisRequest::new(raw.content).html(raw.is_html);
    request.language = parse_language(input.lang.as_deref());
    request.sentence_count = input.sentences;
    request
}

fn run_analyze(analyzer: &Analyzer, input: &InputArgs, ai: bool, filter: Option<FieldFilter>) -> Result<Value> {
    let raw = read_input(input)?;
    let mut request = request_for(raw, input).with_ai(ai);
    request.fields = filter;
    Ok(analyzer.analyze(&request)?)
}

fn run_summarize(analyzer: &Analyzer, input: &InputArgs) -> Result<String> {
    let raw = read_input(input)?;
    let cleaned = document::prepare(&raw.content, raw.is_html);
    let language = match parse_language(input.lang.as_deref()) {
        Some(language) => language,
        None => detect_language(&cleaned.text).language,
    };
    let engine = analyzer.engine();
    let requested = input
        .sentences
        .unwrap_or(analyzer.config().summary.default_sentences);
    let budget = engine.sentence_budget(requested);
    if budget.adjusted {
        warn!(requested = budget.requested, applied = budget.applied, "sentence count adjusted");
    }
    Ok(engine.summarize_by_language(&cleaned.text, language, budget.applied))
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| document::is_supported(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn analyze_file(analyzer: &Analyzer, path: &Path, sentences: Option<usize>, ai: bool) -> Result<Value> {
    let raw = document::read_document(path)?;
    let mut request = AnalysisRequest::new(raw.content).html(raw.is_html).with_ai(ai);
    request.sentence_count = sentences;
    Ok(analyzer.analyze(&request)?)
}

/// Analyze every supported file under `dir` in parallel. Records keep the
/// sorted file order; each carries its `path`.
fn run_batch(
    analyzer: &Analyzer,
    dir: &Path,
    sentences: Option<usize>,
    ai: bool,
) -> Result<(Vec<Value>, Vec<(PathBuf, String)>)> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let files = collect_files(dir);
    info!(files = files.len(), dir = %dir.display(), "starting batch");

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let failures: Mutex<Vec<(PathBuf, String)>> = Mutex::new(Vec::new());

    let records: Vec<Value> = files
        .par_iter()
        .map(|path| {
            let mut record = match analyze_file(analyzer, path, sentences, ai) {
                Ok(record) => record,
                Err(e) => {
                    failures.lock().push((path.clone(), e.to_string()));
                    serde_json::json!({ "ok": false, "error": e.to_string() })
                }
            };
            if let Value::Object(fields) = &mut record {
                fields.insert("path".to_string(), Value::String(path.to_string_lossy().to_string()));
            }
            pb.inc(1);
            record
        })
        .collect();

    pb.finish_with_message("analyzing files");

    let mut failures = failures.into_inner();
    failures.sort();
    Ok((records, failures))
}

fn write_json(value: &Value, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(file, value)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn print_status(stream: &mut StandardStream, label: &str, ok: bool, detail: Option<&str>) -> io::Result<()> {
    write!(stream, "  {:<20} ", label)?;
    let (color, word) = if ok {
        (Color::Green, "available")
    } else {
        (Color::Red, "unavailable")
    };
    stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stream, "{}", word)?;
    stream.reset()?;
    match detail {
        Some(detail) => writeln!(stream, " ({})", detail),
        None => writeln!(stream),
    }
}

fn print_failures(failures: &[(PathBuf, String)]) -> io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(stderr, "{} file(s) failed:", failures.len())?;
    stderr.reset()?;
    for (path, error) in failures {
        writeln!(stderr, "  {}: {}", path.display(), error)?;
    }
    Ok(())
}

fn run_capabilities(analyzer: &Analyzer) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let capability = analyzer.engine().capability();

    writeln!(stdout, "Enhancement backends:")?;
    if capability.statuses().is_empty() {
        writeln!(stdout, "  none configured (basic scoring)")?;
    }
    for status in capability.statuses() {
        print_status(&mut stdout, &status.name, status.available, status.detail.as_deref())?;
    }

    writeln!(stdout, "AI summarization:")?;
    let ai = &analyzer.config().ai;
    let has_key = ai.api_key.as_deref().map(|k| !k.trim().is_empty()).unwrap_or(false);
    let detail = if has_key { ai.model.clone() } else { "no API key".to_string() };
    print_status(&mut stdout, "generative model", has_key, Some(&detail))?;
    Ok(())
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.enhance)?;
    let analyzer = Analyzer::from_config(config);

    match cli.command {
        Commands::Analyze {
            input,
            ai,
            include,
            exclude,
        } => {
            let record = run_analyze(&analyzer, &input, ai, build_filter(include, exclude))?;
            write_json(&record, None)?;
        }
        Commands::Summarize { input } => {
            println!("{}", run_summarize(&analyzer, &input)?);
        }
        Commands::Batch {
            dir,
            out,
            sentences,
            ai,
        } => {
            let (records, failures) = run_batch(&analyzer, &dir, sentences, ai)?;
            let total = records.len();
            write_json(&Value::Array(records), out.as_deref())?;
            print_failures(&failures)?;
            if total > 0 && failures.len() == total {
                return Err(anyhow!("every file in {} failed", dir.display()));
            }
        }
        Commands::Capabilities => run_capabilities(&analyzer)?,
    }
    Ok(())
}
