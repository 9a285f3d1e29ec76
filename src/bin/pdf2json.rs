//! CLI binary for pdf2json.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and runs the batch driver.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2json::{
    is_tesseract_available, process_directory, BatchProgressCallback, ExtractionConfig,
    ProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

/// Terminal progress callback: renders a live progress bar and per-file log
/// lines using [indicatif]. Works correctly when files complete out-of-order
/// (concurrent mode).
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-file wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of files that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_batch_start` (called before any files are processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
        self.bar.reset_eta();
    }

    fn file_label(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        // Switch from spinner-only style to full progress bar now that we
        // know the actual file count.
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting extraction of {total_files} PDFs…"))
        ));
    }

    fn on_file_start(&self, index: usize, _total: usize, path: &Path) {
        self.start_times
            .lock()
            .unwrap()
            .insert(index, Instant::now());
        self.bar.set_message(Self::file_label(path));
    }

    fn on_file_complete(&self, index: usize, total: usize, path: &Path, chars: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {:<40}  {:<12}  {}",
            green("✓"),
            index,
            total,
            Self::file_label(path),
            dim(&format!("{chars:>6} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, path: &Path, error: String) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy. Counted in
        // chars, not bytes — error text routinely carries non-ASCII paths and
        // tesseract stderr, and a byte slice could split a character.
        let msg = if error.chars().count() > 80 {
            let truncated: String = error.chars().take(79).collect();
            format!("{truncated}\u{2026}")
        } else {
            error
        };

        self.bar.println(format!(
            "  {} {:>4}/{:<4}  {:<40}  {}  {}",
            red("✗"),
            index,
            total,
            Self::file_label(path),
            red(&msg),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} PDFs extracted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} PDFs extracted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every PDF in example_data/ into output_json/
  pdf2json

  # Custom input and output directories
  pdf2json ./reports -o ./reports_json

  # English OCR instead of the simplified-Chinese default
  pdf2json ./scans --lang eng

  # Four documents at a time
  pdf2json ./archive --concurrency 4

  # Always OCR (treat every embedded text layer as insufficient)
  pdf2json ./scans --threshold 1000000

  # Quiet mode for cron jobs (errors only on stderr)
  pdf2json ./inbox -o ./processed --quiet --no-progress

OUTPUT FORMAT:
  One JSON file per input PDF, named after it (report.pdf → report.json):

    {"page_content": "<normalized text>",
     "metadata": {"source": "report.pdf", "title": "report"}}

  The text is aggressively normalized for indexing: case-folded, NFKD
  decomposed, all spaces removed (CJK-oriented), blank lines dropped.

OCR FALLBACK:
  Documents whose embedded text layer is shorter than --threshold characters
  are treated as scans: each page is rasterised and run through the
  `tesseract` binary with the --lang language pack. Install tesseract and
  the language data to process scanned PDFs (e.g. `apt install
  tesseract-ocr tesseract-ocr-chi-sim`).

ENVIRONMENT VARIABLES:
  PDF2JSON_OUTPUT       Output directory
  PDF2JSON_LANG         OCR language pack
  PDF2JSON_THRESHOLD    Embedded-text threshold in characters
  PDF2JSON_CONCURRENCY  Concurrent documents
  PDFIUM_DYNAMIC_LIB_PATH  Directory containing the pdfium shared library
"#;

/// Batch-extract text from PDFs into JSON records.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2json",
    version,
    about = "Batch-extract text from PDFs into normalized JSON records",
    long_about = "Extract text from every PDF in a directory into one JSON record per document. \
Reads the embedded text layer first and falls back to Tesseract OCR for scanned documents \
whose text layer is shorter than the threshold.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDFs to process.
    #[arg(default_value = "example_data")]
    input: PathBuf,

    /// Directory to write the JSON records into (created if missing).
    #[arg(short, long, env = "PDF2JSON_OUTPUT", default_value = "output_json")]
    output: PathBuf,

    /// Tesseract language pack for the OCR fallback.
    #[arg(
        long,
        env = "PDF2JSON_LANG",
        default_value = "chi_sim",
        long_help = "Tesseract language pack used when a document falls back to OCR.\n\
          Common choices: chi_sim (simplified Chinese), eng, deu, jpn.\n\
          The pack must be installed (e.g. tesseract-ocr-chi-sim)."
    )]
    lang: String,

    /// Embedded-text threshold in characters; below it, OCR kicks in.
    #[arg(long, env = "PDF2JSON_THRESHOLD", default_value_t = 100)]
    threshold: usize,

    /// Maximum number of PDFs to process in one run.
    #[arg(long, env = "PDF2JSON_MAX_FILES", default_value_t = 5000)]
    max_files: usize,

    /// Number of documents processed concurrently.
    #[arg(short, long, env = "PDF2JSON_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Path to the tesseract binary.
    #[arg(long, env = "PDF2JSON_TESSERACT", default_value = "tesseract")]
    tesseract_path: String,

    /// Maximum rendered page dimension in pixels (OCR fallback only).
    #[arg(long, env = "PDF2JSON_MAX_PIXELS", default_value_t = 2000,
          value_parser = clap::value_parser!(u32).range(100..=10000))]
    max_pixels: u32,

    /// Disable progress bar.
    #[arg(long, env = "PDF2JSON_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2JSON_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    // ── Early tesseract check ────────────────────────────────────────────
    // A missing binary only fails documents that need the OCR fallback, so
    // warn rather than abort.
    if !cli.quiet && !is_tesseract_available(&cli.tesseract_path) {
        eprintln!(
            "{} tesseract not found at '{}' — scanned PDFs will fail. \
             Install it or pass --tesseract-path.",
            cyan("⚠"),
            cli.tesseract_path
        );
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = ExtractionConfig::builder()
        .text_threshold(cli.threshold)
        .ocr_language(&cli.lang)
        .tesseract_path(&cli.tesseract_path)
        .max_rendered_pixels(cli.max_pixels)
        .max_files(cli.max_files)
        .concurrency(cli.concurrency);

    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let summary = process_directory(&cli.input, &cli.output, &config)
        .await
        .context("Batch extraction failed")?;

    // ── Failure report + summary line ────────────────────────────────────
    if !cli.quiet && !summary.failures.is_empty() {
        eprintln!();
        eprintln!("{}", bold("Failed files:"));
        for failure in &summary.failures {
            eprintln!("  {} {}: {}", red("✗"), failure.path.display(), failure.error);
        }
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} extracted, {} failed, {} beyond cap  {}ms  →  {}",
            if summary.is_clean() {
                green("✔")
            } else {
                cyan("⚠")
            },
            summary.processed,
            summary.failed,
            summary.skipped,
            summary.duration_ms,
            bold(&cli.output.display().to_string()),
        );
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
