//! Embedded-text extraction: read each page's text content stream via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling.
//!
//! ## Concatenation contract
//!
//! Per-page fragments are appended in page order with NO separator. Downstream
//! consumers depend on this exact shape, so it must not be "improved" with
//! page breaks or newlines.

use crate::error::ExtractError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Extract the embedded text of every page, concatenated in page order.
///
/// This runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn extract_embedded_text(pdf_path: &Path) -> Result<String, ExtractError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_embedded_text_blocking(&path))
        .await
        .map_err(|e| ExtractError::Internal(format!("Text extraction task panicked: {}", e)))?
}

/// Blocking implementation of embedded-text extraction.
fn extract_embedded_text_blocking(pdf_path: &Path) -> Result<String, ExtractError> {
    let pdfium = super::bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| ExtractError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    debug!("PDF loaded for text extraction: {} pages", total_pages);

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| ExtractError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        text.push_str(&page_text);
    }

    debug!(
        "Embedded text: {} chars across {} pages",
        text.chars().count(),
        total_pages
    );
    Ok(text)
}
