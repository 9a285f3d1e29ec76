//! End-to-end integration tests for pdf2json.
//!
//! The gated tests use real PDF files in `./test_cases/` and need the pdfium
//! shared library (plus tesseract for the OCR paths). They are gated behind
//! the `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture
//!
//! To restrict to a specific test:
//!   E2E_ENABLED=1 cargo test --test e2e test_extract_text_native -- --nocapture
//!
//! The filtering, output-writing, normalization and callback tests at the
//! bottom have no external requirements and always run.

use pdf2json::{
    batch::{eligible_pdfs, json_name, write_record},
    extract_document, is_tesseract_available, normalize_text, process_directory,
    BatchProgressCallback, DocumentRecord, ExtractionConfig, NoopProgressCallback,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/output");
    fs::create_dir_all(&d).ok();
    d
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

/// Assert the record passes the invariants every extraction must uphold.
fn assert_record_quality(record: &DocumentRecord, context: &str) {
    // The normalized text must contain no ASCII spaces and no blank lines.
    assert!(
        !record.page_content.contains(' '),
        "[{context}] Normalized text must not contain spaces"
    );
    assert!(
        !record.page_content.contains("\n\n"),
        "[{context}] Normalized text must not contain blank lines"
    );
    // Case folding already happened; no uppercase ASCII can survive.
    assert!(
        !record.page_content.chars().any(|c| c.is_ascii_uppercase()),
        "[{context}] Normalized text must be case-folded"
    );
    assert!(
        record.metadata.source.ends_with(".pdf"),
        "[{context}] source must keep the .pdf name"
    );

    println!(
        "[{context}] ✓  {} chars, quality checks passed",
        record.page_content.chars().count()
    );
}

// ── Extraction tests (need pdfium; gated) ────────────────────────────────────

/// A text-native PDF must come back through the embedded-text path with
/// non-trivial content and no OCR involvement (works without tesseract).
#[tokio::test]
async fn test_extract_text_native() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("text_native.pdf"));

    let config = ExtractionConfig::default();
    let record = extract_document(&path, &config)
        .await
        .expect("extraction should succeed");

    assert!(
        record.page_content.chars().count() >= 100,
        "Text-native PDF should yield at least threshold-many chars"
    );
    assert_record_quality(&record, "text_native");

    let out = output_dir().join("text_native.json");
    fs::write(&out, serde_json::to_string(&record).unwrap()).ok();
    println!("[text_native] Saved to {}", out.display());
}

/// A scanned (image-only) PDF must fall back to OCR and still produce text.
#[tokio::test]
async fn test_extract_scanned_falls_back_to_ocr() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("scanned.pdf"));
    if !is_tesseract_available("tesseract") {
        println!("SKIP — tesseract not installed");
        return;
    }

    let config = ExtractionConfig::builder()
        .ocr_language("eng")
        .build()
        .expect("valid config");

    let record = extract_document(&path, &config)
        .await
        .expect("OCR extraction should succeed");

    assert!(
        !record.page_content.is_empty(),
        "OCR should recover text from the scan"
    );
    assert_record_quality(&record, "scanned");
}

/// Full batch over test_cases/: every .pdf gets a .json, summary adds up.
#[tokio::test]
async fn test_process_directory_end_to_end() {
    let input = e2e_skip_unless_ready!(test_cases_dir());
    let out = output_dir().join("batch");
    fs::remove_dir_all(&out).ok();

    let config = ExtractionConfig::builder()
        .concurrency(2)
        .build()
        .expect("valid config");

    let summary = process_directory(&input, &out, &config)
        .await
        .expect("batch should run");

    let json_count = fs::read_dir(&out)
        .expect("output dir exists")
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".json"))
        .count();
    assert_eq!(
        json_count, summary.processed,
        "One JSON file per successfully processed PDF"
    );
    assert_eq!(summary.failures.len(), summary.failed);

    println!(
        "[batch] {} processed, {} failed, {}ms",
        summary.processed, summary.failed, summary.duration_ms
    );
}

/// A corrupt PDF must fail its own file without aborting the batch.
#[tokio::test]
async fn test_corrupt_pdf_is_isolated() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
        return;
    }
    let good = test_cases_dir().join("text_native.pdf");
    if !good.exists() {
        println!("SKIP — test file not found: {}", good.display());
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    fs::copy(&good, dir.path().join("good.pdf")).unwrap();
    // Valid magic, garbage body.
    fs::write(dir.path().join("bad.pdf"), b"%PDF-1.4\ngarbage").unwrap();

    let out = dir.path().join("out");
    let summary = process_directory(dir.path(), &out, &ExtractionConfig::default())
        .await
        .expect("batch must survive the corrupt file");

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0]
        .path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .contains("bad"));
    assert!(out.join("good.json").exists());
    assert!(!out.join("bad.json").exists());
}

// ── Filtering and output tests (no pdfium needed, always run) ────────────────

#[test]
fn test_only_exact_case_pdf_suffix_is_eligible() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), b"x").unwrap();
    fs::write(dir.path().join("b.PDF"), b"x").unwrap();
    fs::write(dir.path().join("c.pdf.bak"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let (files, skipped) = eligible_pdfs(dir.path(), 5000).unwrap();
    assert_eq!(files.len(), 1, "only a.pdf is eligible");
    assert_eq!(skipped, 0);
}

#[test]
fn test_max_files_cap_reports_skipped() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("f{i}.pdf")), b"x").unwrap();
    }

    let (files, skipped) = eligible_pdfs(dir.path(), 3).unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(skipped, 2);
}

#[tokio::test]
async fn test_write_record_names_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let record = DocumentRecord::new("内容abc".to_string(), Path::new("年度报告.pdf"));

    let out_path = write_record(dir.path(), &record).await.unwrap();
    assert_eq!(out_path.file_name().unwrap(), "年度报告.json");

    let body = fs::read_to_string(&out_path).unwrap();
    // Non-ASCII must be emitted literally, not \u-escaped.
    assert!(body.contains("内容abc"));
    assert!(body.contains("\"source\":\"年度报告.pdf\""));
    assert!(body.contains("\"title\":\"年度报告\""));

    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    let top = parsed.as_object().unwrap();
    assert_eq!(top.len(), 2, "exactly page_content and metadata");
    assert!(top.contains_key("page_content"));
    assert!(top.contains_key("metadata"));
}

#[test]
fn test_json_name_only_touches_the_suffix() {
    assert_eq!(json_name("report.pdf"), "report.json");
    assert_eq!(json_name("v2.pdf.pdf"), "v2.pdf.json");
    assert_eq!(json_name("no.dots.here.pdf"), "no.dots.here.json");
}

// ── Normalization tests through the public API (always run) ──────────────────

#[test]
fn test_normalize_pipeline_shape() {
    // Casefold + NFKD + space removal + blank-line drop in one pass.
    let input = "Hello World\n\n  ＴＥＳＴ  \nSTRAßE";
    let out = normalize_text(input);
    assert_eq!(out, "helloworld\ntest\nstrasse");
}

#[test]
fn test_normalize_repairs_literal_escapes() {
    // A literal backslash-n in the extracted text becomes a real line break.
    let out = normalize_text("line one\\nline two");
    assert_eq!(out, "lineone\nlinetwo");
}

#[test]
fn test_normalize_is_idempotent_on_typical_text() {
    let once = normalize_text("第一章 概述\nIntroduction to the SYSTEM\n\n结论");
    let twice = normalize_text(&once);
    assert_eq!(once, twice);
}

// ── Callback API tests (always run) ──────────────────────────────────────────

/// `BatchProgressCallback` must be usable as `Arc<dyn …>` moved into a
/// `tokio::spawn` task (the library stores exactly that type).
#[tokio::test]
async fn test_callback_send_in_tokio_spawn() {
    use std::sync::Mutex;

    struct ErrorLogger {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl BatchProgressCallback for ErrorLogger {
        fn on_file_error(&self, _index: usize, _total: usize, _path: &Path, error: String) {
            self.log.lock().unwrap().push(error);
        }
    }

    let logger = Arc::new(ErrorLogger {
        log: Arc::new(Mutex::new(vec![])),
    });
    let log_ref = Arc::clone(&logger.log);

    let cb: Arc<dyn BatchProgressCallback> = logger as Arc<dyn BatchProgressCallback>;

    tokio::spawn(async move {
        cb.on_file_error(2, 5, Path::new("broken.pdf"), "corrupt xref table".to_string());
    })
    .await
    .expect("spawn must succeed");

    let captured = log_ref.lock().unwrap().clone();
    assert_eq!(captured, vec!["corrupt xref table"]);
}

/// Verify that a Noop callback compiles and does not panic.
#[test]
fn test_noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NoopProgressCallback>();

    let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopProgressCallback);
    cb.on_file_error(1, 1, Path::new("x.pdf"), "an error".to_string());
}
