//! HTTP error mapping.
//!
//! Pipeline errors are converted to [`AppError`] and rendered as
//! `{ "error": "<message>" }`. Server-side failures only ever expose the
//! generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intake_core::intake::IntakeError;
use intake_shared::AppError;
use serde::Serialize;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Caller-facing message.
    pub error: String,
}

/// Classify a pipeline failure.
#[must_use]
pub fn to_app_error(err: &IntakeError) -> AppError {
    match err {
        IntakeError::Validation(e) => AppError::Validation(e.to_string()),
        IntakeError::Storage { source, .. } => AppError::Storage(source.to_string()),
        IntakeError::Recording { source, .. } => AppError::Database(source.to_string()),
    }
}

/// Render an application error as an HTTP response.
#[must_use]
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        error: err.public_message().to_string(),
    };
    (status, Json(body)).into_response()
}
