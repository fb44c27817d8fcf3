//! CLI binary for edgequake-doc2txt.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig`, runs the pipeline and prints a summary.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_doc2txt::{
    build_pipeline, ExtractionConfig, ProgressCallback, RunProgressCallback, RunReport,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

/// Terminal progress callback: one bar for the run, one log line per item.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_items: usize) {
        self.bar.set_length(total_items as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_items} files"))
        ));
    }

    fn on_item_start(&self, _index: usize, _total: usize, source: &str) {
        self.bar.set_message(short_name(source));
    }

    fn on_item_complete(&self, index: usize, total: usize, source: &str, chars: usize) {
        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {:<8}  {}",
            green("✓"),
            index,
            total,
            dim(&format!("{chars:>7} chars")),
            source,
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, index: usize, total: usize, source: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {}  {}",
            red("✗"),
            index,
            total,
            source,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_items: usize, written_items: usize) {
        let failed = total_items.saturating_sub(written_items);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files extracted",
                green("✔"),
                bold(&written_items.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files extracted  ({} failed)",
                if failed == total_items {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&written_items.to_string()),
                total_items,
                red(&failed.to_string()),
            );
        }
    }
}

fn short_name(source: &str) -> String {
    std::path::Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Text layers only
  doc2txt --input ./docs --output ./text

  # OCR scanned PDFs and images
  doc2txt --input ./scans --output ./text --ocr

  # German OCR at 400 DPI with an explicit tesseract
  doc2txt -i ./scans -o ./text --ocr --ocr-lang deu --ocr-dpi 400 \
          --tesseract-cmd /opt/tesseract/bin/tesseract

  # Machine-readable run report
  doc2txt -i ./docs -o ./text --ocr --json > report.json

SUPPORTED FILE TYPES:
  txt, csv, log, md            copied verbatim (UTF-8, invalid bytes replaced)
  docx                         paragraph text
  png, jpg, jpeg, tiff, bmp    OCR (empty without --ocr)
  pdf                          text layer; OCR when the text layer is blank
  anything else                empty .txt

ENVIRONMENT VARIABLES:
  DOC2TXT_*         Every flag has an env equivalent (see --help)
  PDFIUM_LIB_PATH   Path to libpdfium, used when --renderer-path is unset
  RUST_LOG          Overrides --log-level / -v / -q

SETUP:
  OCR needs tesseract on PATH (or --tesseract-cmd) and a PDFium shared
  library (--renderer-path or PDFIUM_LIB_PATH) to render scanned PDFs.
  Missing engines degrade the run to text-layer extraction; they never
  abort it.
"#;

/// Convert a directory of documents into plain-text files.
#[derive(Parser, Debug)]
#[command(
    name = "doc2txt",
    version,
    about = "Convert a directory of documents into plain-text files",
    long_about = "Walk an input directory and write one .txt per file into the output \
directory, mirroring its structure. PDFs without a text layer and images are read with \
OCR when --ocr is given.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to convert.
    #[arg(short, long, env = "DOC2TXT_INPUT")]
    input: PathBuf,

    /// Directory to write .txt files into.
    #[arg(short, long, env = "DOC2TXT_OUTPUT")]
    output: PathBuf,

    /// Enable OCR for images and scanned PDFs.
    #[arg(long, env = "DOC2TXT_OCR")]
    ocr: bool,

    /// Path to the tesseract binary (default: found on PATH).
    #[arg(long, env = "DOC2TXT_TESSERACT_CMD")]
    tesseract_cmd: Option<PathBuf>,

    /// PDFium shared library, or the directory holding it.
    #[arg(long, visible_alias = "poppler-path", env = "DOC2TXT_RENDERER_PATH")]
    renderer_path: Option<PathBuf>,

    /// OCR language code(s), e.g. eng or eng+deu.
    #[arg(long, env = "DOC2TXT_OCR_LANG")]
    ocr_lang: Option<String>,

    /// Page rendering DPI for OCR (72–600).
    #[arg(long, env = "DOC2TXT_OCR_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    ocr_dpi: u32,

    /// Directory for per-page scratch images (default: system temp dir).
    #[arg(long, env = "DOC2TXT_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, env = "DOC2TXT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2TXT_QUIET", conflicts_with = "verbose")]
    quiet: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "DOC2TXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOC2TXT_NO_PROGRESS")]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO lines would interleave with the bar; keep warnings only
    // while it is shown unless the user asked for more.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else if show_progress {
        "warn".to_string()
    } else {
        cli.log_level.clone()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    std::fs::create_dir_all(&cli.output).with_context(|| {
        format!("Failed to create output directory {}", cli.output.display())
    })?;

    // ── Run ──────────────────────────────────────────────────────────────
    let mut pipeline = build_pipeline(&config, &cli.output);
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        pipeline = pipeline.with_progress(cb);
    }

    // A missing or non-directory input is logged by the provider and
    // yields an empty report.
    let input = cli.input.to_string_lossy();
    let report = pipeline.run(&input);

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report, &cli, show_progress);
    }

    // Item failures are reported, not fatal.
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .ocr_enabled(cli.ocr)
        .ocr_dpi(cli.ocr_dpi);

    if let Some(ref path) = cli.tesseract_cmd {
        builder = builder.tesseract_cmd(path);
    }
    if let Some(ref path) = cli.renderer_path {
        builder = builder.renderer_path(path);
    }
    if let Some(ref lang) = cli.ocr_lang {
        builder = builder.ocr_lang(lang);
    }
    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_dir(dir);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &RunReport, cli: &Cli, show_progress: bool) {
    let stats = &report.stats;

    // The callback already printed the final tick.
    if !show_progress {
        eprintln!(
            "{}  {}/{} files  {}ms  →  {}",
            if stats.failed_items == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.written_items,
            stats.total_items,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
    }

    if stats.ocr_items > 0 || stats.degraded_items > 0 {
        eprintln!(
            "   {} via OCR  /  {} degraded",
            dim(&stats.ocr_items.to_string()),
            dim(&stats.degraded_items.to_string()),
        );
    }

    for failure in report.failures() {
        if let Some(ref e) = failure.error {
            eprintln!("   {} {}", red("✗"), e);
        }
    }
}
