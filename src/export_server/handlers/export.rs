//! Export handler.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::warn;

use super::super::types::{ExportResponse, ExportState};
use crate::export::handle_export;

/// Runs one export per request.
///
/// Mounted for every method so that non-POST requests get the same plain-text
/// error body as other failures.
pub async fn export_handler(
    State(state): State<ExportState>,
    method: Method,
    body: Bytes,
) -> Response {
    match handle_export(&state.config, &method, &body).await {
        Ok(result) => (StatusCode::OK, Json(ExportResponse::from(result))).into_response(),
        Err(e) => {
            let kind = e.kind();
            if kind.is_validation() {
                warn!("Rejected export request ({kind}): {e}");
            }
            e.into_response()
        }
    }
}
