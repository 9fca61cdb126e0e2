//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-supplied input was rejected.
    #[error("Validation error: {0}")]
    Validation(String),

    /// File storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Metadata store failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Generic message returned to callers for server-side failures.
    pub const SERVER_FAILURE_MESSAGE: &'static str = "Error saving message and files";

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Storage(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for logs and API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Message safe to send across the network boundary.
    ///
    /// Validation details describe the caller's own input and are passed
    /// through; server-side details never leave the process.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
            Self::Storage(_) | Self::Database(_) => Self::SERVER_FAILURE_MESSAGE,
        }
    }
}
