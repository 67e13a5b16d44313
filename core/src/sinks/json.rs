use std::path::{Path, PathBuf};

use crate::report::ScanReport;

use super::{ResultSink, SinkError};

/// Writes the full report, untruncated, as pretty printed JSON.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonSink {
    fn name(&self) -> &str {
        "json"
    }

    fn write(&self, report: &ScanReport) -> Result<(), SinkError> {
        let rendered = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, rendered).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
