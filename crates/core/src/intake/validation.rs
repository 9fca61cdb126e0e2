//! Request validation.
//!
//! Everything here runs before a single byte reaches storage.

use std::sync::Arc;

use intake_shared::IntakeConfig;

use super::error::ValidationError;
use super::types::{AttachedFile, SubmissionFields, SubmissionRequest, ValidatedSubmission};

/// Validates required fields, file count, and per-file type and size.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    config: Arc<IntakeConfig>,
}

impl RequestValidator {
    /// Create a validator bound to the intake limits.
    #[must_use]
    pub fn new(config: Arc<IntakeConfig>) -> Self {
        Self { config }
    }

    /// Validate a whole submission.
    ///
    /// Fields are checked first, then the file count, then every file in
    /// order. The first failure rejects the submission.
    pub fn validate(&self, request: SubmissionRequest) -> Result<ValidatedSubmission, ValidationError> {
        let fields = Self::validate_fields(&request)?;

        if request.files.len() > self.config.max_files {
            return Err(ValidationError::TooManyFiles {
                count: request.files.len(),
                max: self.config.max_files,
            });
        }

        for file in &request.files {
            self.validate_file(file)?;
        }

        Ok(ValidatedSubmission {
            fields,
            files: request.files,
        })
    }

    /// Check that `name`, `email`, `project` and `message` are present and
    /// not blank.
    pub fn validate_fields(request: &SubmissionRequest) -> Result<SubmissionFields, ValidationError> {
        Ok(SubmissionFields {
            name: required("name", request.name.as_deref())?,
            email: required("email", request.email.as_deref())?,
            project: required("project", request.project.as_deref())?,
            message: required("message", request.message.as_deref())?,
        })
    }

    /// Check a single file's declared MIME type and size.
    pub fn validate_file(&self, file: &AttachedFile) -> Result<(), ValidationError> {
        if !self.config.is_mime_type_allowed(&file.content_type) {
            return Err(ValidationError::invalid_mime_type(
                &file.original_name,
                &file.content_type,
            ));
        }

        if file.size > self.config.max_file_size {
            return Err(ValidationError::file_too_large(
                &file.original_name,
                file.size,
                self.config.max_file_size,
            ));
        }

        Ok(())
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::missing_field(field)),
    }
}
