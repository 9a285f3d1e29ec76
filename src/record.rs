//! Output types: the per-document record and the end-of-run batch summary.
//!
//! [`DocumentRecord`] is the persistent unit: exactly one per processed PDF,
//! immutable after creation, serialized once as a standalone JSON object.
//! `serde_json` emits non-ASCII characters literally (it never escapes above
//! U+007F), which is exactly the required output encoding.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One structured record per input document.
///
/// JSON shape (two top-level keys, nothing else):
///
/// ```json
/// {"page_content": "...", "metadata": {"source": "report.pdf", "title": "report"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The final canonical text: unicode-normalized, no space characters,
    /// no blank lines.
    pub page_content: String,
    /// Provenance of the record.
    pub metadata: RecordMetadata,
}

/// Provenance metadata stored inside each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Original file name, including the `.pdf` extension.
    pub source: String,
    /// File name without its extension.
    pub title: String,
}

impl DocumentRecord {
    /// Build a record from canonical text and the input path.
    ///
    /// `source` is the file name with extension, `title` the file name
    /// without it.
    pub fn new(page_content: String, pdf_path: &Path) -> Self {
        let source = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = pdf_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            page_content,
            metadata: RecordMetadata { source, title },
        }
    }
}

/// One failed document within a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// Path of the input PDF that faulted.
    pub path: PathBuf,
    /// Human-readable cause, rendered from the underlying [`crate::ExtractError`].
    pub error: String,
}

/// End-of-run report for one batch invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Documents whose record was written successfully.
    pub processed: usize,
    /// Documents that faulted and were skipped.
    pub failed: usize,
    /// Eligible documents left unprocessed because the `max_files` cap was hit.
    pub skipped: usize,
    /// One entry per failed document.
    pub failures: Vec<FileFailure>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

impl BatchSummary {
    /// True when every attempted document produced a record.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_from_file_name() {
        let r = DocumentRecord::new("text".into(), Path::new("/data/report_final.pdf"));
        assert_eq!(r.metadata.source, "report_final.pdf");
        assert_eq!(r.metadata.title, "report_final");
    }

    #[test]
    fn metadata_keeps_inner_dots() {
        let r = DocumentRecord::new(String::new(), Path::new("v1.2-draft.pdf"));
        assert_eq!(r.metadata.source, "v1.2-draft.pdf");
        assert_eq!(r.metadata.title, "v1.2-draft");
    }

    #[test]
    fn json_shape_has_exactly_two_top_level_keys() {
        let r = DocumentRecord::new("abc".into(), Path::new("a.pdf"));
        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("page_content"));
        assert!(obj.contains_key("metadata"));
        let meta = obj["metadata"].as_object().unwrap();
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn json_emits_non_ascii_literally() {
        let r = DocumentRecord::new("中文café".into(), Path::new("doc.pdf"));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("中文café"), "got: {json}");
        assert!(!json.contains("\\u"), "non-ASCII must not be escaped: {json}");
    }

    #[test]
    fn record_round_trips_through_json() {
        let r = DocumentRecord::new("hello\nworld".into(), Path::new("doc.pdf"));
        let json = serde_json::to_string(&r).unwrap();
        let back: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn clean_summary() {
        let s = BatchSummary {
            processed: 3,
            ..Default::default()
        };
        assert!(s.is_clean());
        let s = BatchSummary {
            processed: 2,
            failed: 1,
            ..Default::default()
        };
        assert!(!s.is_clean());
    }
}
