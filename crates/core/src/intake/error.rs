//! Intake error types.

use thiserror::Error;

use super::types::{IngestionStage, StoredFile};
use crate::storage::StorageError;

/// Client input rejected before any file is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is absent or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// More files than a submission may carry.
    #[error("too many files: {count} exceeds maximum {max}")]
    TooManyFiles {
        /// Number of files received.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Display name yields no usable storage namespace.
    #[error("name cannot be used as a storage namespace")]
    InvalidName,

    /// MIME type not in the allow-list.
    #[error("invalid file type '{mime_type}' for '{filename}'; only PDF, DOC, DOCX, XLS, XLSX and CSV are allowed")]
    InvalidMimeType {
        /// Original filename.
        filename: String,
        /// Declared MIME type.
        mime_type: String,
    },

    /// File exceeds the size cap.
    #[error("file '{filename}' is {size} bytes, exceeding the maximum of {max} bytes")]
    FileTooLarge {
        /// Original filename.
        filename: String,
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },
}

impl ValidationError {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(filename: impl Into<String>, size: u64, max: u64) -> Self {
        Self::FileTooLarge {
            filename: filename.into(),
            size,
            max,
        }
    }
}

/// Metadata store failures.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// The store rejected the write or could not be reached.
    #[error("metadata store write failed: {0}")]
    Store(String),

    /// The store did not answer in time.
    #[error("metadata store did not respond within {secs}s")]
    Timeout {
        /// Configured timeout.
        secs: u64,
    },
}

impl RecordingError {
    /// Create a store error.
    #[must_use]
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

/// A failed submission.
///
/// Storage and recording failures carry the files already written so the
/// caller can report them; nothing is deleted.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Client input was rejected. No side effects.
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    /// A file write failed.
    #[error("failed to store files: {source}")]
    Storage {
        /// Underlying storage error.
        source: StorageError,
        /// Files written before the failure.
        committed: Vec<StoredFile>,
    },

    /// The metadata write failed after all files were stored.
    #[error("failed to record submission: {source}")]
    Recording {
        /// Underlying recording error.
        source: RecordingError,
        /// Files written for this submission.
        committed: Vec<StoredFile>,
    },
}

impl IntakeError {
    /// Last stage the submission reached before failing.
    #[must_use]
    pub fn stage(&self) -> IngestionStage {
        match self {
            Self::Validation(ValidationError::InvalidName) => IngestionStage::Validated,
            Self::Validation(_) => IngestionStage::Received,
            Self::Storage { .. } => IngestionStage::Namespaced,
            Self::Recording { .. } => IngestionStage::FilesStored,
        }
    }

    /// Files left on disk by this failed submission.
    #[must_use]
    pub fn committed(&self) -> &[StoredFile] {
        match self {
            Self::Validation(_) => &[],
            Self::Storage { committed, .. } | Self::Recording { committed, .. } => committed,
        }
    }

    /// Whether the failure was caused by client input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
