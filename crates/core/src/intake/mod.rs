//! Submission intake pipeline.
//!
//! This module provides the business logic for accepting a submission:
//! - Field, file count, MIME type and size validation
//! - Namespace derivation from the submitter's display name
//! - Concurrent file storage with all-or-nothing validation
//! - Metadata recording through [`SubmissionRecorder`]

mod error;
mod namespace;
mod service;
mod types;
mod validation;

pub use error::{IntakeError, RecordingError, ValidationError};
pub use namespace::{MAX_NAMESPACE_LEN, Namespace, normalize};
pub use service::{IntakeService, SubmissionRecorder};
pub use types::{
    AttachedFile, FileManifestEntry, IngestionStage, NewSubmission, StoredFile, SubmissionFields,
    SubmissionReceipt, SubmissionRecord, SubmissionRequest, ValidatedSubmission,
};
pub use validation::RequestValidator;
