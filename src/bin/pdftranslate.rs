//! CLI binary for pdftranslate.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslationConfig` and prints progress.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdftranslate::progress::{format_elapsed, format_timestamp, page_progress_line};
use pdftranslate::{
    inspect, translate_file, Block, OverflowPolicy, PageReport, ProgressCallback, RunSummary,
    StandardFont, TranslatedBlock, TranslationConfig, TranslationProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar anchored at the bottom of the terminal
/// with the run and page log lines printed above it.
///
/// With `--no-progress` the bar is hidden and lines go straight to stderr.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = if show_bar {
            let bar = ProgressBar::new(0); // length set in on_run_start
            let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(spinner_style);
            bar.set_prefix("Preparing");
            bar.set_message("Opening PDF…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };
        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Translating");
        self.bar.reset_eta();
    }

    /// Print a line above the bar, or to stderr when the bar is hidden.
    fn emit(&self, line: impl AsRef<str>) {
        if self.bar.is_hidden() {
            eprintln!("{}", line.as_ref());
        } else {
            self.bar.println(line.as_ref());
        }
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_pages: usize, selected: &[usize]) {
        self.activate_bar(selected.len());
        self.emit(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Start time: {}", format_timestamp(Local::now())))
        ));
        self.emit(format!("  Total pages: {total_pages}"));
        self.emit(format!("  Pages to process: {selected:?}"));
    }

    fn on_page_start(&self, page_num: usize, position: usize, selected: usize, elapsed: Duration) {
        self.emit(page_progress_line(
            Local::now(),
            elapsed,
            page_num,
            position,
            selected,
        ));
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_blocks_extracted(&self, page_num: usize, blocks: &[Block]) {
        self.emit(dim(&format!("  Blocks before translation (page {page_num}):")));
        for block in blocks {
            self.emit(dim(&format!("    {block}")));
        }
    }

    fn on_block_translated(&self, _page_num: usize, block: &TranslatedBlock) {
        self.emit(format!("    Original:   {:?}", block.original));
        self.emit(format!("    Translated: {:?}", block.translated));
    }

    fn on_page_translated(&self, page_num: usize, blocks: &[TranslatedBlock]) {
        self.emit(dim(&format!("  Blocks after translation (page {page_num}):")));
        for block in blocks {
            self.emit(dim(&format!("    {block}")));
        }
    }

    fn on_page_complete(&self, report: &PageReport) {
        self.emit(format!(
            "  {} Page {:>3}  {:<12}  {}",
            green("✓"),
            report.page_num,
            dim(&format!("{:>3} blocks", report.translated_blocks)),
            dim(&format!("{:.1}s", report.duration_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, summary: &RunSummary, output: &Path) {
        self.bar.finish_and_clear();
        self.emit(format!(
            "{} {}",
            green("✔"),
            bold(&format!("End time: {}", format_timestamp(Local::now())))
        ));
        self.emit(format!("  Pages processed: {}", summary.pages.len()));
        self.emit(format!(
            "  Total elapsed: {}",
            format_elapsed(Duration::from_millis(summary.total_duration_ms))
        ));
        self.emit(format!("  Output: {}", bold(&output.display().to_string())));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate ./docs/input.pdf into ./docs/output.pdf
  pdftranslate

  # Skip the cover page, show block dumps
  pdftranslate --input report.pdf --output report.en.pdf --start 2 --debug

  # A local model through Ollama
  pdftranslate --provider ollama --model llama3.2 --input in.pdf

  # German to French, larger overlay text
  pdftranslate --source-lang German --target-lang French --font-size 10

  # Page count and sizes only (no model needed)
  pdftranslate --inspect-only --input in.pdf

OUTPUT LAYOUT:
  Every selected page N becomes two output pages: a copy of page N, then a
  page of the same size with each text block redrawn in translation at the
  position of the original block.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  OLLAMA_HOST             Ollama endpoint for local models
  EDGEQUAKE_PROVIDER      Provider for --provider
  EDGEQUAKE_MODEL         Model for --model
  PDFIUM_LIB_PATH         Path to libpdfium
  RUST_LOG                Override the log filter
"#;

/// Translate the text of a PDF onto interleaved overlay pages.
#[derive(Parser, Debug)]
#[command(
    name = "pdftranslate",
    version,
    about = "Translate a PDF page by page onto interleaved overlay pages",
    long_about = "Copy each selected page of a PDF and follow it with a page of the same size \
where every text block is redrawn in translation at its original position. Translation uses \
any provider supported by edgequake-llm, including local models through Ollama.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source PDF.
    #[arg(long, default_value = "./docs/input.pdf")]
    input: PathBuf,

    /// Destination PDF.
    #[arg(long, default_value = "./docs/output.pdf")]
    output: PathBuf,

    /// First page to process, 1-indexed.
    #[arg(long, default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..))]
    start: u64,

    /// Last page to process, 1-indexed. 0 or past the end means the last page.
    #[arg(long, default_value_t = 0)]
    end: usize,

    /// Dump text blocks before and after translation.
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM model ID (e.g. gpt-4.1-nano, llama3.2).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// Language of the source document.
    #[arg(long, default_value = "Swedish")]
    source_lang: String,

    /// Language to translate into.
    #[arg(long, default_value = "English")]
    target_lang: String,

    /// Padding applied around each block rectangle, in points.
    #[arg(long, default_value_t = pdftranslate::config::DEFAULT_PADDING)]
    padding: f32,

    /// Overlay font size in points (4–72).
    #[arg(long, default_value_t = pdftranslate::config::DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Overlay font.
    #[arg(long, value_enum, default_value = "helvetica")]
    font: FontArg,

    /// What to do with lines that do not fit in their rectangle.
    #[arg(long, value_enum, default_value = "clip")]
    overflow: OverflowArg,

    /// PDF user password for encrypted documents.
    #[arg(long)]
    password: Option<String>,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Print page count and sizes only, no translation.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FontArg {
    Helvetica,
    Courier,
    Times,
}

impl From<FontArg> for StandardFont {
    fn from(v: FontArg) -> Self {
        match v {
            FontArg::Helvetica => StandardFont::Helvetica,
            FontArg::Courier => StandardFont::Courier,
            FontArg::Times => StandardFont::TimesRoman,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OverflowArg {
    Clip,
    Skip,
    Overflow,
}

impl From<OverflowArg> for OverflowPolicy {
    fn from(v: OverflowArg) -> Self {
        match v {
            OverflowArg::Clip => OverflowPolicy::Clip,
            OverflowArg::Skip => OverflowPolicy::Skip,
            OverflowArg::Overflow => OverflowPolicy::Overflow,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress callback prints the run log itself; library INFO logs
    // would only duplicate it.
    let show_bar = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_bar {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if cli.quiet {
        None
    } else {
        Some(CliProgressCallback::new(show_bar) as Arc<dyn TranslationProgressCallback>)
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&cli.input, &config).context("Failed to inspect PDF")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialize document info")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
            for (i, (w, h)) in info.page_sizes.iter().enumerate() {
                println!("  page {:>3}:   {:.1} x {:.1} pt", i + 1, w, h);
            }
        }
        return Ok(());
    }

    // ── Run translation ──────────────────────────────────────────────────
    let summary = translate_file(&cli.input, &cli.output, &config).with_context(|| {
        format!(
            "Translation of {} into {} failed",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise run summary")?
        );
    }

    Ok(())
}

/// Map CLI args to `TranslationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let start = usize::try_from(cli.start).context("--start is too large")?;

    let mut builder = TranslationConfig::builder()
        .pages(start, cli.end)
        .debug(cli.debug)
        .languages(cli.source_lang.clone(), cli.target_lang.clone())
        .padding(cli.padding)
        .font(cli.font.into())
        .font_size(cli.font_size)
        .overflow(cli.overflow.into());

    if let Some(ref name) = cli.provider {
        builder = builder.provider_name(name.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
