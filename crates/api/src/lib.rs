//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The contact submission endpoint (multipart intake)
//! - Health check
//! - Mapping of pipeline errors to HTTP responses

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use intake_core::intake::{IntakeService, SubmissionRecorder};
use intake_shared::IntakeConfig;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
pub struct AppState<R: SubmissionRecorder> {
    /// Ingestion pipeline.
    pub intake: Arc<IntakeService<R>>,
    /// Intake limits, shared with the pipeline.
    pub config: Arc<IntakeConfig>,
}

impl<R: SubmissionRecorder> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            intake: Arc::clone(&self.intake),
            config: Arc::clone(&self.config),
        }
    }
}

/// Creates the main application router.
///
/// The default body limit is raised so a submission carrying the maximum
/// number of maximum-size files still reaches the multipart reader.
pub fn create_router<R: SubmissionRecorder + 'static>(state: AppState<R>) -> Router {
    let body_limit = state.config.max_body_size();

    Router::new()
        .nest("/api", routes::api_routes::<R>())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
