//! Batch driver: iterate a directory of PDFs, extract each, write one JSON
//! record per document.
//!
//! ## Failure isolation
//!
//! Each document runs inside its own failure boundary: an error is logged
//! with the file path and underlying cause, recorded as a
//! [`FileFailure`], and the batch continues with the next file. One corrupt
//! PDF never takes down the remaining work. Only output-directory creation
//! and the initial directory scan abort the whole run.
//!
//! ## Atomic writes
//!
//! Records are written to a temporary file in the output directory and then
//! renamed into place. An interrupted run leaves either a complete record or
//! nothing — never a truncated JSON file.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extract::extract_document;
use crate::record::{BatchSummary, DocumentRecord, FileFailure};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Process every eligible PDF in `input_dir`, writing one `.json` record per
/// document into `output_dir`.
///
/// Eligibility: regular files whose name ends with the exact-case literal
/// `.pdf` (`b.PDF` is ignored). At most `config.max_files` files are
/// processed, in directory-listing order; eligible files beyond the cap are
/// counted as `skipped` in the summary and left for a later run.
///
/// Documents are independent, so `config.concurrency > 1` processes several
/// at once; the default of 1 reproduces strictly sequential behaviour.
///
/// # Errors
/// Returns `Err` only for batch-fatal conditions: the input directory cannot
/// be listed or the output directory cannot be created. Per-document failures
/// are collected into the returned [`BatchSummary`].
pub async fn process_directory(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<BatchSummary, ExtractError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    let start = Instant::now();

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let (files, skipped) = eligible_pdfs(input_dir, config.max_files)?;
    let total = files.len();
    info!(
        "Batch start: {} eligible PDFs in {} ({} beyond cap)",
        total,
        input_dir.display(),
        skipped
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let results: Vec<Result<(), FileFailure>> = stream::iter(
        files.iter().enumerate().map(|(i, path)| {
            let config = config.clone();
            let output_dir = output_dir.to_path_buf();
            let path = path.clone();
            async move { process_one(&path, i + 1, total, &output_dir, &config).await }
        }),
    )
    // concurrency is a pub field and may be hand-set to 0, which would make
    // buffer_unordered never poll anything.
    .buffer_unordered(config.concurrency.max(1))
    .collect()
    .await;

    let mut summary = BatchSummary {
        skipped,
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(()) => summary.processed += 1,
            Err(failure) => {
                summary.failed += 1;
                summary.failures.push(failure);
            }
        }
    }
    summary.duration_ms = start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, summary.processed);
    }

    info!(
        "Batch complete: {}/{} files in {}ms ({} failed, {} skipped)",
        summary.processed, total, summary.duration_ms, summary.failed, summary.skipped
    );

    Ok(summary)
}

/// Synchronous wrapper around [`process_directory`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_directory_sync(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<BatchSummary, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process_directory(input_dir, output_dir, config))
}

/// One document's failure boundary: extract, write, report.
async fn process_one(
    path: &Path,
    index: usize,
    total: usize,
    output_dir: &Path,
    config: &ExtractionConfig,
) -> Result<(), FileFailure> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(index, total, path);
    }

    let outcome = async {
        let record = extract_document(path, config).await?;
        let out_path = write_record(output_dir, &record).await?;
        info!("Successfully wrote {}", out_path.display());
        Ok::<DocumentRecord, ExtractError>(record)
    }
    .await;

    match outcome {
        Ok(record) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(index, total, path, record.page_content.chars().count());
            }
            Ok(())
        }
        Err(e) => {
            warn!("Skipping '{}': {}", path.display(), e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(index, total, path, e.to_string());
            }
            Err(FileFailure {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    }
}

/// List eligible PDFs in directory order, capped at `max_files`.
///
/// Returns the capped file list plus the count of eligible files beyond the
/// cap. The suffix check is exact-case `.pdf` — `scan.PDF` is not eligible.
pub fn eligible_pdfs(
    input_dir: &Path,
    max_files: usize,
) -> Result<(Vec<PathBuf>, usize), ExtractError> {
    let entries = std::fs::read_dir(input_dir).map_err(|e| ExtractError::InputDirUnreadable {
        path: input_dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    let mut skipped = 0usize;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_pdf = entry.file_name().to_string_lossy().ends_with(".pdf");
        if !is_pdf || !path.is_file() {
            continue;
        }
        if files.len() < max_files {
            files.push(path);
        } else {
            skipped += 1;
        }
    }

    Ok((files, skipped))
}

/// Output file name for a record: the `.pdf` suffix replaced with `.json`.
pub fn json_name(source: &str) -> String {
    match source.strip_suffix(".pdf") {
        Some(stem) => format!("{stem}.json"),
        None => format!("{source}.json"),
    }
}

/// Write one record atomically: temp file in the output dir, then rename.
pub async fn write_record(
    output_dir: &Path,
    record: &DocumentRecord,
) -> Result<PathBuf, ExtractError> {
    let out_path = output_dir.join(json_name(&record.metadata.source));
    let json = serde_json::to_string(record)
        .map_err(|e| ExtractError::Internal(format!("Record serialization failed: {}", e)))?;

    let tmp_path = out_path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: out_path.clone(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, &out_path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: out_path.clone(),
            source: e,
        })?;

    Ok(out_path)
}
