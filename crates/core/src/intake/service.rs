//! Ingestion coordinator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use intake_shared::IntakeConfig;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::{IntakeError, RecordingError};
use super::namespace::Namespace;
use super::types::{
    AttachedFile, IngestionStage, NewSubmission, StoredFile, SubmissionReceipt, SubmissionRecord,
    SubmissionRequest,
};
use super::validation::RequestValidator;
use crate::storage::FileStore;

/// Persists submission records.
///
/// This trait is implemented by the db crate to provide the actual write.
pub trait SubmissionRecorder: Send + Sync {
    /// Persist one submission as a single write.
    fn record(
        &self,
        submission: NewSubmission,
    ) -> impl std::future::Future<Output = Result<SubmissionRecord, RecordingError>> + Send;
}

/// Runs the validate → namespace → store → record pipeline.
pub struct IntakeService<R: SubmissionRecorder> {
    validator: RequestValidator,
    store: Arc<FileStore>,
    recorder: Arc<R>,
    record_timeout: Duration,
}

impl<R: SubmissionRecorder> IntakeService<R> {
    /// Create a new intake service.
    #[must_use]
    pub fn new(config: Arc<IntakeConfig>, store: Arc<FileStore>, recorder: Arc<R>) -> Self {
        let record_timeout = Duration::from_secs(config.record_timeout_secs);
        Self {
            validator: RequestValidator::new(config),
            store,
            recorder,
            record_timeout,
        }
    }

    /// Accept one submission.
    ///
    /// Validation is all-or-nothing: one bad file rejects the whole
    /// submission before anything is written. Files are then written
    /// concurrently and the metadata record is written only after every
    /// file write has finished successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing or a file is rejected
    /// - The display name yields no usable namespace
    /// - Any file write fails or times out
    /// - The metadata write fails or times out
    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, IntakeError> {
        let mut progress = Progress::new(Uuid::now_v7());

        let result = self.run(&mut progress, request).await;
        if let Err(e) = &result {
            progress.fail(e);
        }
        result
    }

    async fn run(
        &self,
        progress: &mut Progress,
        request: SubmissionRequest,
    ) -> Result<SubmissionReceipt, IntakeError> {
        let validated = self.validator.validate(request)?;
        progress.advance(IngestionStage::Validated);

        let namespace = Namespace::resolve(&validated.fields.name)?;
        progress.advance(IngestionStage::Namespaced);

        let stored = self.store_all(&namespace, &validated.files).await?;
        progress.advance(IngestionStage::FilesStored);

        let submission = NewSubmission {
            id: progress.id,
            fields: validated.fields,
            files: stored.iter().map(StoredFile::manifest_entry).collect(),
            date: Utc::now(),
        };

        let record = match tokio::time::timeout(self.record_timeout, self.recorder.record(submission))
            .await
        {
            Ok(Ok(record)) => record,
            Ok(Err(source)) => {
                return Err(IntakeError::Recording {
                    source,
                    committed: stored,
                });
            }
            Err(_) => {
                return Err(IntakeError::Recording {
                    source: RecordingError::Timeout {
                        secs: self.record_timeout.as_secs(),
                    },
                    committed: stored,
                });
            }
        };
        progress.advance(IngestionStage::Recorded);

        let receipt = SubmissionReceipt {
            id: record.id,
            files: record.files,
            date: record.date,
        };
        progress.advance(IngestionStage::Completed);

        info!(
            submission_id = %receipt.id,
            namespace = %namespace,
            files = receipt.files.len(),
            "Submission completed"
        );
        Ok(receipt)
    }

    /// Write every file and wait for all writes to finish.
    ///
    /// On failure the successfully written files are returned inside the
    /// error instead of being deleted.
    async fn store_all(
        &self,
        namespace: &Namespace,
        files: &[AttachedFile],
    ) -> Result<Vec<StoredFile>, IntakeError> {
        let writes = files
            .iter()
            .map(|file| self.store.store(namespace, &file.original_name, &file.content));
        let results = join_all(writes).await;

        let mut committed = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(stored) => committed.push(stored),
                Err(e) if failure.is_none() => failure = Some(e),
                Err(e) => warn!(error = %e, "Additional file write failed"),
            }
        }

        match failure {
            Some(source) => Err(IntakeError::Storage { source, committed }),
            None => Ok(committed),
        }
    }
}

/// Tracks the stage a single submission has reached.
struct Progress {
    id: Uuid,
    stage: IngestionStage,
}

impl Progress {
    fn new(id: Uuid) -> Self {
        debug!(submission_id = %id, stage = %IngestionStage::Received, "Submission stage");
        Self {
            id,
            stage: IngestionStage::Received,
        }
    }

    fn advance(&mut self, next: IngestionStage) {
        debug_assert!(next > self.stage);
        self.stage = next;
        debug!(submission_id = %self.id, stage = %next, "Submission stage");
    }

    fn fail(&self, err: &IntakeError) {
        debug_assert_eq!(err.stage(), self.stage);
        if err.is_client_error() {
            warn!(
                submission_id = %self.id,
                stage = %self.stage,
                error = %err,
                "Submission rejected"
            );
            return;
        }

        error!(
            submission_id = %self.id,
            stage = %self.stage,
            committed = err.committed().len(),
            error = ?err,
            "Submission failed"
        );
        for file in err.committed() {
            error!(
                submission_id = %self.id,
                path = %file.path.display(),
                "Orphaned file left on disk; no submission record references it"
            );
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
