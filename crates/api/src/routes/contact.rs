//! Contact submission route.
//!
//! `POST /api/contact` accepts `multipart/form-data` with the text fields
//! `name`, `email`, `project`, `message` and up to five file parts named
//! `files`.

use axum::{
    Json, Router,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use bytes::BytesMut;
use intake_core::intake::{AttachedFile, SubmissionRecorder, SubmissionRequest};
use intake_shared::{AppError, IntakeConfig};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::{error_response, to_app_error};

/// Message returned when a submission is saved.
pub const SUCCESS_MESSAGE: &str = "Message and files saved successfully";

/// Multipart part name carrying files.
const FILES_FIELD: &str = "files";

/// Creates the contact routes.
pub fn routes<R: SubmissionRecorder + 'static>() -> Router<AppState<R>> {
    Router::new().route("/contact", post(submit_contact::<R>))
}

/// Response for an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Confirmation message.
    pub message: &'static str,
}

/// POST `/contact`
/// Accept a contact submission with attached files.
async fn submit_contact<R: SubmissionRecorder + 'static>(
    State(state): State<AppState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected non-multipart contact request");
            return error_response(&AppError::Validation(
                "expected a multipart/form-data payload".to_string(),
            ));
        }
    };

    let request = match read_submission(multipart, &state.config).await {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed multipart payload");
            return error_response(&AppError::Validation(
                "malformed multipart payload".to_string(),
            ));
        }
    };

    match state.intake.submit(request).await {
        Ok(receipt) => {
            info!(
                submission_id = %receipt.id,
                files = receipt.files.len(),
                "Contact submission saved"
            );
            (
                StatusCode::OK,
                Json(SubmitResponse {
                    message: SUCCESS_MESSAGE,
                }),
            )
                .into_response()
        }
        Err(e) => {
            let app_err = to_app_error(&e);
            if e.is_client_error() {
                warn!(error_code = app_err.error_code(), error = %app_err, "Contact submission rejected");
            } else {
                error!(error_code = app_err.error_code(), error = %app_err, "Contact submission failed");
            }
            error_response(&app_err)
        }
    }
}

/// Collect the multipart payload into a [`SubmissionRequest`].
///
/// Unknown parts are skipped. File parts past `max_files` are counted but
/// not buffered so validation can still report the real count.
async fn read_submission(
    mut multipart: Multipart,
    config: &IntakeConfig,
) -> Result<SubmissionRequest, MultipartError> {
    let mut request = SubmissionRequest::default();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "name" => request.name = Some(field.text().await?),
            "email" => request.email = Some(field.text().await?),
            "project" => request.project = Some(field.text().await?),
            "message" => request.message = Some(field.text().await?),
            FILES_FIELD => {
                let buffer_limit = if request.files.len() < config.max_files {
                    config.max_file_size
                } else {
                    0
                };
                request.files.push(read_file(&mut field, buffer_limit).await?);
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Read one file part chunk by chunk.
///
/// Bytes beyond `buffer_limit` are counted towards the size but dropped.
async fn read_file(field: &mut Field<'_>, buffer_limit: u64) -> Result<AttachedFile, MultipartError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    let mut content = BytesMut::new();
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        if size <= buffer_limit {
            content.extend_from_slice(&chunk);
        }
    }

    Ok(AttachedFile {
        original_name,
        content_type,
        size,
        content: content.freeze(),
    })
}

#[cfg(test)]
#[path = "contact_tests.rs"]
mod tests;
