//! Error types for the pdf2json library.
//!
//! A single [`ExtractError`] covers every failure mode. All of them are fatal
//! *for one document*: the batch driver catches them, records a
//! [`crate::record::FileFailure`], and continues with the next file. Only
//! output-directory creation and the initial directory scan abort a whole
//! batch run.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! bad document, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2json library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The input directory could not be listed.
    #[error("Failed to read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error while reading a page's embedded text.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium returned an error while rasterising a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The tesseract binary could not be spawned at all.
    #[error("Failed to run tesseract (is it installed? path='{tesseract_path}'): {detail}")]
    OcrUnavailable {
        tesseract_path: String,
        detail: String,
    },

    /// tesseract ran but exited with a failure for one page.
    #[error("OCR failed for page {page} (exit code {code}): {detail}")]
    OcrFailed {
        page: usize,
        code: i32,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write a record file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install a pdfium shared library and make it discoverable, or set\n\
PDFIUM_DYNAMIC_LIB_PATH to the directory containing libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_failed_display() {
        let e = ExtractError::OcrFailed {
            page: 3,
            code: 1,
            detail: "Error opening data file".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("exit code 1"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display() {
        let e = ExtractError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"Dear",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn ocr_unavailable_names_binary_path() {
        let e = ExtractError::OcrUnavailable {
            tesseract_path: "/opt/tesseract".into(),
            detail: "No such file or directory".into(),
        };
        assert!(e.to_string().contains("/opt/tesseract"));
    }
}
