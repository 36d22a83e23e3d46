//! Liveness handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Answers `200 ok` as long as the server accepts requests. Does not touch the database.
pub async fn health_handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}
