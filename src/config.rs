//! Configuration types for batch PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! The defaults suit unattended bulk ingestion: a 100-character
//! embedded-text threshold, simplified-Chinese OCR, at most 5000 files per
//! run, strictly sequential processing.

use crate::error::ExtractError;
use crate::progress::BatchProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF-to-JSON extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2json::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .ocr_language("eng")
///     .max_files(100)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Minimum embedded-text length (in characters) below which a document is
    /// treated as scanned and sent through OCR. Default: 100.
    ///
    /// A deliberately coarse, stateless heuristic: a text-native PDF almost
    /// always embeds far more than 100 characters, while an image-only scan
    /// embeds none (or a handful of artefacts). No layout analysis, no
    /// per-page decision, no confidence scoring.
    pub text_threshold: usize,

    /// Tesseract recognition-language identifier. Default: "chi_sim".
    ///
    /// A static configuration value, not data-driven per document. Use the
    /// identifiers tesseract itself understands ("eng", "chi_sim", "deu", …).
    pub ocr_language: String,

    /// Path to the tesseract binary. Default: "tesseract" (relies on PATH).
    pub tesseract_path: String,

    /// Maximum rendered image dimension (width or height) in pixels when
    /// rasterising pages for OCR. Default: 2000.
    ///
    /// A safety cap independent of page size. Rendering an A0 poster at full
    /// resolution could produce a 13 000 × 18 000 px image and exhaust memory;
    /// this field caps either dimension, scaling the other proportionally.
    /// 2000 px on the longest edge keeps body text comfortably above the
    /// resolution tesseract needs.
    pub max_rendered_pixels: u32,

    /// Maximum number of files processed per run. Default: 5000.
    ///
    /// Once the cap is reached, remaining eligible files in directory-listing
    /// order are simply not processed in that run (no error, no partial
    /// marker).
    pub max_files: usize,

    /// Number of documents processed concurrently. Default: 1 (sequential).
    ///
    /// Documents are independent: no shared mutable state, and output naming
    /// is a pure function of input naming, so raising this is safe. Output
    /// files are written atomically either way.
    pub concurrency: usize,

    /// Optional progress callback receiving per-file events.
    pub progress_callback: Option<Arc<dyn BatchProgressCallback>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            text_threshold: 100,
            ocr_language: "chi_sim".to_string(),
            tesseract_path: "tesseract".to_string(),
            max_rendered_pixels: 2000,
            max_files: 5000,
            concurrency: 1,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("text_threshold", &self.text_threshold)
            .field("ocr_language", &self.ocr_language)
            .field("tesseract_path", &self.tesseract_path)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_files", &self.max_files)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn text_threshold(mut self, chars: usize) -> Self {
        self.config.text_threshold = chars;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tesseract_path(mut self, path: impl Into<String>) -> Self {
        self.config.tesseract_path = path.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn max_files(mut self, n: usize) -> Self {
        self.config.max_files = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn BatchProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(ExtractError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        if c.max_files == 0 {
            return Err(ExtractError::InvalidConfig("max_files must be ≥ 1".into()));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
