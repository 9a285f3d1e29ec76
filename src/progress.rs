//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! real-time events as the batch driver processes each document.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a database record, or a terminal progress bar
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so it works correctly when
//! documents are processed concurrently.
//!
//! # Example
//!
//! ```rust
//! use pdf2json::{BatchProgressCallback, ExtractionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, path: &Path, chars: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {} ({} chars)", index, total, path.display(), chars);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it processes each document.
///
/// Implementations must be `Send + Sync` (documents may be processed
/// concurrently when `concurrency > 1`). All methods have default no-op
/// implementations so callers only override what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any document is processed.
    ///
    /// # Arguments
    /// * `total_files` — number of eligible files that will be processed
    ///   (after the `.pdf` filter and the `max_files` cap)
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a document's extraction begins.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position within the batch
    /// * `total` — total files in the batch
    /// * `path`  — the input PDF path
    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called when a document's record was extracted and written.
    ///
    /// # Arguments
    /// * `chars` — character count of the canonical `page_content`
    fn on_file_complete(&self, index: usize, total: usize, path: &Path, chars: usize) {
        let _ = (index, total, path, chars);
    }

    /// Called when a document failed and the batch moved on.
    fn on_file_error(&self, index: usize, total: usize, path: &Path, error: String) {
        let _ = (index, total, path, error);
    }

    /// Called once after all files have been attempted.
    ///
    /// # Arguments
    /// * `total_files`   — files attempted in this batch
    /// * `success_count` — files that produced an output record
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
