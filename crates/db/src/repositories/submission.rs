//! Submission repository for database operations.
//!
//! Each submission is persisted with a single `INSERT`, so a record and its
//! manifest are written atomically.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::submissions;
use intake_core::intake::{
    FileManifestEntry, NewSubmission, RecordingError, SubmissionRecord, SubmissionRecorder,
};

/// Submission repository implementation.
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    db: DatabaseConnection,
}

impl SubmissionRepository {
    /// Create a new submission repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a submission by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored manifest is corrupt.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SubmissionRecord>, DbErr> {
        submissions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    /// List a submitter's submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored manifest is corrupt.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<SubmissionRecord>, DbErr> {
        submissions::Entity::find()
            .filter(submissions::Column::Email.eq(email))
            .order_by_desc(submissions::Column::Date)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}

impl SubmissionRecorder for SubmissionRepository {
    async fn record(&self, submission: NewSubmission) -> Result<SubmissionRecord, RecordingError> {
        let files = serde_json::to_value(&submission.files)
            .map_err(|e| RecordingError::store(e.to_string()))?;

        let active_model = submissions::ActiveModel {
            id: Set(submission.id),
            name: Set(submission.fields.name),
            email: Set(submission.fields.email),
            project: Set(submission.fields.project),
            message: Set(submission.fields.message),
            files: Set(files),
            date: Set(submission.date.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| RecordingError::store(e.to_string()))?;
        debug!(submission_id = %model.id, "Submission row inserted");

        to_domain(model).map_err(|e| RecordingError::store(e.to_string()))
    }
}

/// Convert database model to domain model.
fn to_domain(model: submissions::Model) -> Result<SubmissionRecord, DbErr> {
    let files: Vec<FileManifestEntry> =
        serde_json::from_value(model.files).map_err(|e| DbErr::Json(e.to_string()))?;

    Ok(SubmissionRecord {
        id: model.id,
        name: model.name,
        email: model.email,
        project: model.project,
        message: model.message,
        files,
        date: model.date.with_timezone(&chrono::Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn model(files: serde_json::Value) -> submissions::Model {
        submissions::Model {
            id: Uuid::nil(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            project: "Retrofit".to_string(),
            message: "Hello".to_string(),
            files,
            date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap().into(),
        }
    }

    #[test]
    fn test_to_domain_reads_manifest() {
        let record = to_domain(model(json!([
            {"filename": "1-abcd1234-a.pdf", "path": "/srv/uploads/jane_doe/uploaded_files/1-abcd1234-a.pdf"}
        ])))
        .expect("should convert");

        assert_eq!(record.files.len(), 1);
        assert_eq!(record.files[0].filename, "1-abcd1234-a.pdf");
        assert_eq!(record.date, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_to_domain_empty_manifest() {
        let record = to_domain(model(json!([]))).expect("should convert");
        assert!(record.files.is_empty());
    }

    #[test]
    fn test_to_domain_rejects_corrupt_manifest() {
        let err = to_domain(model(json!({"filename": "x"}))).unwrap_err();
        assert!(matches!(err, DbErr::Json(_)));
    }
}
