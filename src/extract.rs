//! Per-document extraction entry points.
//!
//! The extraction selector is the only nontrivial decision in the pipeline:
//! try the cheap path (embedded text), and only when it yields less than the
//! threshold fall back to the expensive one (rasterise + OCR). Rasterisation
//! and recognition are each orders of magnitude slower than reading the
//! content stream, so the common case of a text-native PDF never pays for
//! them.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::{embedded, normalize, ocr, raster};
use crate::record::DocumentRecord;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Decide whether a direct-extraction candidate needs the OCR fallback.
///
/// The comparison counts Unicode scalar values, not bytes: "100 characters"
/// means the same thing for Chinese text as for ASCII. The cutoff is a
/// deliberately coarse heuristic for "this PDF has real embedded text" vs.
/// "this PDF is a scan" — below the threshold the candidate is discarded
/// entirely, never merged with the OCR result.
pub fn needs_ocr(candidate: &str, threshold: usize) -> bool {
    candidate.chars().count() < threshold
}

/// Extract one PDF document into a [`DocumentRecord`].
///
/// Algorithm:
/// 1. Attempt direct extraction: every page's embedded text, concatenated in
///    page order with no separator.
/// 2. If the candidate has at least `config.text_threshold` characters,
///    accept it and skip OCR.
/// 3. Otherwise discard it, rasterise every page, OCR each image with the
///    configured language, and concatenate the recognized text (no
///    separator). This candidate wins regardless of its own length.
/// 4. Normalize the winning candidate and attach `{source, title}` metadata
///    derived from the file name.
///
/// # Errors
/// Any failure — unreadable or corrupt PDF, rasterisation error, tesseract
/// spawn/exit failure — is fatal for this document and propagates. The batch
/// driver decides whether to skip-and-continue.
pub async fn extract_document(
    pdf_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentRecord, ExtractError> {
    let pdf_path = pdf_path.as_ref();
    let start = Instant::now();
    info!("Processing file: {}", pdf_path.display());

    validate_pdf_path(pdf_path)?;

    let candidate = embedded::extract_embedded_text(pdf_path).await?;

    let raw_text = if needs_ocr(&candidate, config.text_threshold) {
        info!(
            "Embedded text too sparse ({} chars < {}), falling back to OCR: {}",
            candidate.chars().count(),
            config.text_threshold,
            pdf_path.display()
        );
        let pages = raster::render_pages(pdf_path, config.max_rendered_pixels).await?;
        ocr::recognize_pages(pages, &config.ocr_language, &config.tesseract_path).await?
    } else {
        debug!(
            "Embedded text accepted ({} chars), skipping OCR",
            candidate.chars().count()
        );
        candidate
    };

    let page_content = normalize::normalize_text(&raw_text);
    let record = DocumentRecord::new(page_content, pdf_path);

    info!(
        "Extracted '{}' in {}ms ({} canonical chars)",
        record.metadata.source,
        start.elapsed().as_millis(),
        record.page_content.chars().count()
    );

    Ok(record)
}

/// Synchronous wrapper around [`extract_document`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_document_sync(
    pdf_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<DocumentRecord, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_document(pdf_path, config))
}

/// Validate existence, readability, and the `%PDF` magic bytes.
///
/// pdfium would fail on these too, but with opaque errors; checking up front
/// gives callers a precise diagnosis.
fn validate_pdf_path(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}
