//! OCR: recognize rasterised pages via the Tesseract CLI.
//!
//! Requires `tesseract` to be installed and available on PATH (or the path
//! configured explicitly). Each page image is written as PNG to a managed
//! temp directory, recognized with `tesseract <img> stdout -l <lang>`, and
//! the per-page results are concatenated in page order with NO separator —
//! the same shape as the embedded-text path.
//!
//! ## Why PNG?
//!
//! Lossless compression preserves glyph edges. JPEG artefacts on rendered
//! text measurably degrade tesseract's accuracy at moderate resolutions.
//!
//! ## Why the CLI and not bindings?
//!
//! Shelling out keeps the build free of the leptonica/tesseract C toolchain
//! and isolates OCR crashes in a child process. The cost of one process
//! spawn per page is noise next to recognition time.

use crate::error::ExtractError;
use image::DynamicImage;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Run OCR over every rasterised page and concatenate the recognized text.
///
/// This runs inside `spawn_blocking`: tesseract is a blocking, CPU-bound
/// child process and the PNG encoding is not free either.
pub async fn recognize_pages(
    pages: Vec<(usize, DynamicImage)>,
    language: &str,
    tesseract_path: &str,
) -> Result<String, ExtractError> {
    let language = language.to_string();
    let tesseract_path = tesseract_path.to_string();

    tokio::task::spawn_blocking(move || recognize_pages_blocking(&pages, &language, &tesseract_path))
        .await
        .map_err(|e| ExtractError::Internal(format!("OCR task panicked: {}", e)))?
}

/// Blocking implementation of per-page OCR.
fn recognize_pages_blocking(
    pages: &[(usize, DynamicImage)],
    language: &str,
    tesseract_path: &str,
) -> Result<String, ExtractError> {
    let temp_dir = tempfile::tempdir()
        .map_err(|e| ExtractError::Internal(format!("Failed to create temp directory: {}", e)))?;

    info!("Running OCR on {} pages (lang={})", pages.len(), language);

    let mut text = String::new();
    for (idx, image) in pages {
        let image_path = temp_dir.path().join(format!("page-{:04}.png", idx + 1));
        image
            .save(&image_path)
            .map_err(|e| ExtractError::Internal(format!("Failed to encode page PNG: {}", e)))?;

        let page_text = recognize_image(&image_path, idx + 1, language, tesseract_path)?;
        debug!("OCR page {}: {} chars", idx + 1, page_text.chars().count());
        text.push_str(&page_text);
    }

    // temp_dir (and every page PNG) is deleted on drop
    Ok(text)
}

/// Recognize one page image: `tesseract <img> stdout -l <lang>`.
fn recognize_image(
    image_path: &Path,
    page: usize,
    language: &str,
    tesseract_path: &str,
) -> Result<String, ExtractError> {
    let output = Command::new(tesseract_path)
        .arg(image_path.as_os_str())
        .arg("stdout")
        .arg("-l")
        .arg(language)
        .output()
        .map_err(|e| ExtractError::OcrUnavailable {
            tesseract_path: tesseract_path.to_string(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ExtractError::OcrFailed {
            page,
            code: output.status.code().unwrap_or(-1),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check whether a tesseract binary is runnable at the given path.
///
/// Used by the CLI for an early, friendly diagnostic and by tests to skip
/// OCR cases on machines without tesseract.
pub fn is_tesseract_available(tesseract_path: &str) -> bool {
    Command::new(tesseract_path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
