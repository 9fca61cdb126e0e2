//! Submission types and data structures.

use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A submission as received from the client, before validation.
///
/// Text fields are optional because the client may omit them entirely.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    /// Submitter display name.
    pub name: Option<String>,
    /// Submitter email address.
    pub email: Option<String>,
    /// Project description.
    pub project: Option<String>,
    /// Free-text message.
    pub message: Option<String>,
    /// Attached files in upload order.
    pub files: Vec<AttachedFile>,
}

/// A file attached to a submission.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    /// Filename supplied by the client.
    pub original_name: String,
    /// MIME type declared by the client.
    pub content_type: String,
    /// Total size of the uploaded part in bytes.
    ///
    /// May exceed `content.len()` when the reader stopped buffering an
    /// oversized part.
    pub size: u64,
    /// Raw file content.
    pub content: Bytes,
}

impl AttachedFile {
    /// Create an attached file whose size is the length of its content.
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            size: u64::try_from(content.len()).unwrap_or(u64::MAX),
            content,
        }
    }
}

/// Required text fields after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFields {
    /// Submitter display name.
    pub name: String,
    /// Submitter email address.
    pub email: String,
    /// Project description.
    pub project: String,
    /// Free-text message.
    pub message: String,
}

/// A submission whose fields and files passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    /// Required text fields.
    pub fields: SubmissionFields,
    /// Accepted files in upload order.
    pub files: Vec<AttachedFile>,
}

/// A file written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated, collision-free filename.
    pub filename: String,
    /// Absolute path of the stored file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

impl StoredFile {
    /// Manifest entry referencing this file.
    #[must_use]
    pub fn manifest_entry(&self) -> FileManifestEntry {
        FileManifestEntry {
            filename: self.filename.clone(),
            path: self.path.to_string_lossy().into_owned(),
        }
    }
}

/// Reference to a stored file inside a submission record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManifestEntry {
    /// Generated filename.
    pub filename: String,
    /// Absolute storage path.
    pub path: String,
}

/// Input for persisting a submission record.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    /// Submission ID.
    pub id: Uuid,
    /// Validated text fields.
    pub fields: SubmissionFields,
    /// Manifest of stored files, in upload order.
    pub files: Vec<FileManifestEntry>,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Submission ID.
    pub id: Uuid,
    /// Submitter display name.
    pub name: String,
    /// Submitter email address.
    pub email: String,
    /// Project description.
    pub project: String,
    /// Free-text message.
    pub message: String,
    /// Manifest of stored files.
    pub files: Vec<FileManifestEntry>,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

/// Summary returned after a submission completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// ID of the recorded submission.
    pub id: Uuid,
    /// Manifest of stored files.
    pub files: Vec<FileManifestEntry>,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
}

/// Stages a submission moves through.
///
/// `Received → Validated → Namespaced → FilesStored → Recorded → Completed`.
/// A failed submission reports the last stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionStage {
    /// Payload accepted from the client.
    Received,
    /// Fields and files passed validation.
    Validated,
    /// Storage namespace resolved.
    Namespaced,
    /// All files written.
    FilesStored,
    /// Metadata record persisted.
    Recorded,
    /// Receipt returned.
    Completed,
}

impl IngestionStage {
    /// Convert to a log-friendly string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Namespaced => "namespaced",
            Self::FilesStored => "files_stored",
            Self::Recorded => "recorded",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
