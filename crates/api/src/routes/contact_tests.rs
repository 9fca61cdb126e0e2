use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use intake_core::intake::{
    IntakeService, NewSubmission, RecordingError, SubmissionRecord, SubmissionRecorder,
};
use intake_core::storage::FileStore;
use intake_shared::IntakeConfig;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

const BOUNDARY: &str = "intake-test-boundary";

#[derive(Default)]
struct MockRecorder {
    records: Mutex<Vec<SubmissionRecord>>,
    fail: bool,
}

impl MockRecorder {
    fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl SubmissionRecorder for MockRecorder {
    async fn record(&self, submission: NewSubmission) -> Result<SubmissionRecord, RecordingError> {
        if self.fail {
            return Err(RecordingError::store("connection refused"));
        }
        let record = SubmissionRecord {
            id: submission.id,
            name: submission.fields.name,
            email: submission.fields.email,
            project: submission.fields.project,
            message: submission.fields.message,
            files: submission.files,
            date: submission.date,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

fn app(config: IntakeConfig, recorder: MockRecorder) -> (axum::Router, Arc<MockRecorder>) {
    let config = Arc::new(config);
    let store = Arc::new(FileStore::from_config(&config).expect("should create store"));
    let recorder = Arc::new(recorder);
    let intake = Arc::new(IntakeService::new(
        Arc::clone(&config),
        store,
        Arc::clone(&recorder),
    ));
    (create_router(AppState { intake, config }), recorder)
}

struct Part<'a> {
    filename: &'a str,
    content_type: &'a str,
    content: &'a [u8],
}

fn pdf(filename: &str) -> Part<'_> {
    Part {
        filename,
        content_type: "application/pdf",
        content: b"%PDF-1.7 test",
    }
}

fn multipart_body(fields: &[(&str, &str)], files: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for part in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                part.filename, part.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn full_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane Doe"),
        ("email", "jane@example.com"),
        ("project", "Office fit-out"),
        ("message", "Please find the documents attached."),
    ]
}

fn contact_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn uploaded_files(root: &Path, namespace: &str) -> Vec<std::path::PathBuf> {
    let dir = root.join(namespace).join("uploaded_files");
    if !dir.exists() {
        return Vec::new();
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[tokio::test]
async fn test_submit_with_files_returns_success() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let body = multipart_body(
        &full_fields(),
        &[
            pdf("quote.pdf"),
            Part {
                filename: "budget.csv",
                content_type: "text/csv",
                content: b"a,b\n1,2\n",
            },
        ],
    );

    let (status, json) = send(app, contact_request(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Message and files saved successfully");
    assert_eq!(recorder.count(), 1);
    assert_eq!(uploaded_files(tmp.path(), "jane_doe").len(), 2);

    let records = recorder.records.lock().unwrap();
    assert_eq!(records[0].email, "jane@example.com");
    assert!(records[0].files[0].filename.ends_with("-quote.pdf"));
    assert!(records[0].files[1].filename.ends_with("-budget.csv"));
}

#[tokio::test]
async fn test_submit_without_files_returns_success() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());

    let (status, _) = send(app, contact_request(multipart_body(&full_fields(), &[]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorder.count(), 1);
    assert!(recorder.records.lock().unwrap()[0].files.is_empty());
}

#[tokio::test]
async fn test_unknown_parts_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let mut fields = full_fields();
    fields.push(("newsletter", "yes"));

    let (status, _) = send(app, contact_request(multipart_body(&fields, &[]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn test_very_long_name_is_not_a_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let long_name = "山".repeat(90);
    let fields: Vec<(&str, &str)> = full_fields()
        .into_iter()
        .map(|(key, value)| if key == "name" { (key, long_name.as_str()) } else { (key, value) })
        .collect();

    let (status, _) = send(app, contact_request(multipart_body(&fields, &[pdf("quote.pdf")]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorder.count(), 1);
    assert_eq!(uploaded_files(tmp.path(), &"山".repeat(33)).len(), 1);
}

#[tokio::test]
async fn test_disallowed_type_returns_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let body = multipart_body(
        &full_fields(),
        &[
            pdf("quote.pdf"),
            Part {
                filename: "run.exe",
                content_type: "application/x-msdownload",
                content: b"MZ",
            },
        ],
    );

    let (status, json) = send(app, contact_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("run.exe"));
    assert_eq!(recorder.count(), 0);
    assert!(uploaded_files(tmp.path(), "jane_doe").is_empty());
}

#[tokio::test]
async fn test_missing_email_returns_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let fields: Vec<_> = full_fields()
        .into_iter()
        .filter(|(name, _)| *name != "email")
        .collect();

    let (status, json) = send(app, contact_request(multipart_body(&fields, &[]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "missing required field: email");
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_too_many_files_returns_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let names: Vec<String> = (0..6).map(|i| format!("{i}.pdf")).collect();
    let files: Vec<Part<'_>> = names.iter().map(|name| pdf(name)).collect();

    let (status, _) = send(app, contact_request(multipart_body(&full_fields(), &files))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(recorder.count(), 0);
    assert!(uploaded_files(tmp.path(), "jane_doe").is_empty());
}

#[tokio::test]
async fn test_oversized_file_returns_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let config = IntakeConfig::new(tmp.path()).with_max_file_size(16);
    let (app, recorder) = app(config, MockRecorder::default());
    let big = vec![b'x'; 64];
    let body = multipart_body(
        &full_fields(),
        &[Part {
            filename: "big.csv",
            content_type: "text/csv",
            content: &big,
        }],
    );

    let (status, json) = send(app, contact_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("big.csv"));
    assert_eq!(recorder.count(), 0);
    assert!(uploaded_files(tmp.path(), "jane_doe").is_empty());
}

#[tokio::test]
async fn test_recording_failure_returns_generic_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let recorder = MockRecorder {
        fail: true,
        ..MockRecorder::default()
    };
    let (app, _) = app(IntakeConfig::new(tmp.path()), recorder);

    let (status, json) = send(
        app,
        contact_request(multipart_body(&full_fields(), &[pdf("quote.pdf")])),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Error saving message and files");
    // Written files are left in place when the record fails.
    assert_eq!(uploaded_files(tmp.path(), "jane_doe").len(), 1);
}

#[tokio::test]
async fn test_non_multipart_body_returns_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, recorder) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Jane"}"#))
        .unwrap();

    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_health_check() {
    let tmp = tempfile::tempdir().unwrap();
    let (app, _) = app(IntakeConfig::new(tmp.path()), MockRecorder::default());
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
