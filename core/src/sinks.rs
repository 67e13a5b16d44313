//! Consumers of a finished [`ScanReport`].
//!
//! Every sink renders successes and failures distinctly; truncating long
//! payloads is their business, not the orchestrator's.

pub mod json;
pub mod pdf;

use std::borrow::Cow;
use std::path::PathBuf;

use thiserror::Error;

use crate::report::ScanReport;

pub use json::JsonSink;
pub use pdf::PdfSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render PDF: {0}")]
    Pdf(String),
}

pub trait ResultSink {
    fn name(&self) -> &str;

    fn write(&self, report: &ScanReport) -> Result<(), SinkError>;
}

/// Cuts `text` to at most `max_chars` characters, marking the cut.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}… [truncated]", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
