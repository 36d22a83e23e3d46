//! Export server data structures.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::config::Config;
use crate::error_handling::ExportError;
use crate::export::ExportResult;

/// Shared state for the export server
#[derive(Clone)]
pub struct ExportState {
    pub config: Arc<Config>,
}

/// JSON response for a successful `/export`
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub message: &'static str,
    pub file: String,
    pub url: String,
    pub rows: u64,
    pub skipped_rows: u64,
}

impl From<ExportResult> for ExportResponse {
    fn from(result: ExportResult) -> Self {
        Self {
            message: "Export successful",
            file: result.file_path.to_string_lossy().into_owned(),
            url: result.public_url,
            rows: result.rows_written,
            skipped_rows: result.rows_skipped,
        }
    }
}

/// Failures are answered with a plain-text body.
impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.to_string()).into_response()
    }
}
