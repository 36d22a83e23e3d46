//! End-to-end handling of one export request.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use axum::http::Method;
use chrono::Utc;
use csv::Writer;
use log::{error, info, warn};

use crate::config::Config;
use crate::database::DbConnection;
use crate::error_handling::ExportError;
use crate::export::request::ExportRequest;
use crate::export::streamer;
use crate::export::types::ExportResult;

const QUERY_PREVIEW_CHARS: usize = 100;

/// Validates a raw request and runs the export it describes.
///
/// Method and body are checked before anything is acquired, so validation
/// failures leave no connection, directory or file behind.
pub async fn handle_export(
    config: &Config,
    method: &Method,
    body: &[u8],
) -> Result<ExportResult, ExportError> {
    if *method != Method::POST {
        return Err(ExportError::BadMethod);
    }
    let request = ExportRequest::parse(body)?;
    run_export(config, &request).await
}

/// Runs a validated export.
///
/// Order of operations: connect and ping, create the export directory, create
/// the output file, stream the query result into it. A failure after the file
/// was created leaves the partial file in place.
pub async fn run_export(
    config: &Config,
    request: &ExportRequest,
) -> Result<ExportResult, ExportError> {
    let started = Instant::now();
    info!("Export requested: {}", query_preview(&request.query));

    let mut connection = DbConnection::open(&config.database).await?;

    let file_name = request.file_name(Utc::now());
    // A failure here resurfaces as a file creation error below
    if let Err(e) = std::fs::create_dir_all(&config.export_dir) {
        warn!(
            "Failed to create export directory {}: {e}",
            config.export_dir.display()
        );
    }

    let file_path = config.export_dir.join(&file_name);
    let file = match File::create(&file_path) {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create output file {}: {e}", file_path.display());
            connection.close().await;
            return Err(ExportError::FileCreate(e.to_string()));
        }
    };

    let mut writer = Writer::from_writer(file);
    let outcome = streamer::stream(&mut connection, &request.query, &mut writer).await;
    // Release the file handle before the connection round-trip
    drop(writer);
    connection.close().await;

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            error!("Export to {} failed ({}): {e}", file_path.display(), e.kind());
            return Err(e);
        }
    };

    if summary.rows_skipped > 0 {
        warn!(
            "Export to {} skipped {} unreadable rows",
            file_path.display(),
            summary.rows_skipped
        );
    }
    info!(
        "Exported {} rows x {} columns to {} in {:.2}s",
        summary.rows_written,
        summary.columns.len(),
        file_path.display(),
        started.elapsed().as_secs_f64()
    );

    Ok(ExportResult {
        file_path: absolute_path(&file_path),
        public_url: public_url(&config.public_url_prefix, &file_name),
        rows_written: summary.rows_written,
        rows_skipped: summary.rows_skipped,
    })
}

/// Public URL of an exported file: `<prefix>/<file name>`.
pub fn public_url(prefix: &str, file_name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file_name)
}

fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn query_preview(query: &str) -> String {
    let mut preview: String = query.chars().take(QUERY_PREVIEW_CHARS).collect();
    if query.chars().count() > QUERY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
