//! # pdf2json
//!
//! Batch-extract text from PDF documents into normalized JSON records.
//!
//! ## Why this crate?
//!
//! Document-ingestion pipelines need plain text, but real-world PDF corpora
//! mix text-native documents with pure scans. This crate reads the embedded
//! text layer first (fast, exact) and falls back to Tesseract OCR only when
//! a document yields almost no embedded text — the telltale sign of a
//! scanned PDF. Every document comes out as one JSON record with the same
//! aggressive normalization applied, so downstream consumers never care
//! which path produced it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory of PDFs
//!  │
//!  ├─ 1. Scan      list files ending in .pdf, capped at max_files
//!  ├─ 2. Embedded  read the text layer via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Select    < text_threshold chars? → OCR fallback, else accept
//!  ├─ 4. OCR       rasterise pages, run tesseract per page, concatenate
//!  ├─ 5. Normalize casefold → NFKD → strip spaces → repair escapes → rebuild lines
//!  └─ 6. Output    one {page_content, metadata} JSON record per PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2json::{process_directory, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let summary = process_directory("example_data", "output_json", &config).await?;
//!     eprintln!("{} extracted, {} failed", summary.processed, summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! Single documents work too:
//!
//! ```rust,no_run
//! use pdf2json::{extract_document, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let record = extract_document("scan.pdf", &ExtractionConfig::default()).await?;
//!     println!("{}", serde_json::to_string(&record)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2json` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2json = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime requirements
//!
//! The embedded-text and rasterisation stages need the pdfium shared library
//! on the loader path. The OCR fallback shells out to the `tesseract` binary
//! with the configured language pack (`chi_sim` by default); a missing
//! binary only fails documents that actually need OCR.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod progress;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{process_directory, process_directory_sync};
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{extract_document, extract_document_sync, needs_ocr};
pub use pipeline::normalize::normalize_text;
pub use pipeline::ocr::is_tesseract_available;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{BatchSummary, DocumentRecord, FileFailure, RecordMetadata};
