//! API route definitions.

use axum::Router;
use intake_core::intake::SubmissionRecorder;

use crate::AppState;

pub mod contact;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes<R: SubmissionRecorder + 'static>() -> Router<AppState<R>> {
    Router::new()
        .merge(health::routes())
        .merge(contact::routes())
}
