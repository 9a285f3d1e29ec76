//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch OCR backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! path ──▶ embedded ──▶ (< threshold?) ──▶ raster ──▶ ocr ──▶ normalize
//!          (pdfium)                        (pdfium)  (tesseract)  (pure)
//! ```
//!
//! 1. [`embedded`]  — extract per-page embedded text via pdfium; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`raster`]    — rasterise every page to a `DynamicImage`; only reached
//!    when the embedded candidate falls below the threshold
//! 3. [`ocr`]       — PNG-encode each page to a temp file and run the
//!    tesseract CLI on it; the only stage shelling out to another process
//! 4. [`normalize`] — the pure canonical-text transform applied to whichever
//!    candidate won

pub mod embedded;
pub mod normalize;
pub mod ocr;
pub mod raster;

use crate::error::ExtractError;
use pdfium_render::prelude::*;

/// Bind to the pdfium shared library.
///
/// Resolution order: the directory named by `PDFIUM_DYNAMIC_LIB_PATH` (no
/// fallback when set, so a misconfigured path surfaces instead of silently
/// binding elsewhere), then the current directory, then the system loader
/// path. A failed bind maps to [`ExtractError::PdfiumBindingFailed`] with its
/// remediation text rather than panicking inside a blocking task.
pub(crate) fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    let bindings = match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Ok(dir) => {
            // pdfium_platform_library_name_at_path appends the library file
            // name to the string, so the directory needs a trailing slash.
            let dir = format!("{}/", dir.trim_end_matches('/'));
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        Err(_) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only env-var-mutating test in this binary; safe without
    // serialization because nothing else in the lib tests reads it.
    #[test]
    fn misconfigured_lib_path_reports_binding_error() {
        std::env::set_var("PDFIUM_DYNAMIC_LIB_PATH", "/definitely/not/a/real/dir");
        let result = bind_pdfium();
        std::env::remove_var("PDFIUM_DYNAMIC_LIB_PATH");

        let err = result.unwrap_err();
        assert!(
            matches!(err, ExtractError::PdfiumBindingFailed(_)),
            "got: {err}"
        );
        assert!(err.to_string().contains("PDFIUM_DYNAMIC_LIB_PATH"));
    }
}
