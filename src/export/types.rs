//! Export types.

use std::path::PathBuf;

/// What the streamer produced for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Column names in result order; also the CSV header
    pub columns: Vec<String>,
    /// Data rows written after the header
    pub rows_written: u64,
    /// Rows dropped because a cell could not be decoded
    pub rows_skipped: u64,
}

impl StreamSummary {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows_written: 0,
            rows_skipped: 0,
        }
    }
}

/// A completed export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Absolute path of the CSV file
    pub file_path: PathBuf,
    /// Public URL the host application serves the file under
    pub public_url: String,
    pub rows_written: u64,
    pub rows_skipped: u64,
}
