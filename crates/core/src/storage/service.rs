//! Filesystem-backed file store.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use intake_shared::IntakeConfig;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::StorageError;
use crate::intake::{Namespace, StoredFile};

/// Directory inside each namespace that holds uploaded files.
pub const UPLOADED_FILES_DIR: &str = "uploaded_files";

/// Attempts at drawing a fresh name before giving up.
const MAX_NAME_ATTEMPTS: usize = 4;

/// Longest sanitized original filename kept in a generated name.
const MAX_ORIGINAL_NAME_LEN: usize = 150;

/// Last timestamp handed out, in milliseconds since the Unix epoch.
static LAST_TIMESTAMP_MS: AtomicU64 = AtomicU64::new(0);

/// Writes accepted files under `<root>/<namespace>/uploaded_files`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    write_timeout: Duration,
}

impl FileStore {
    /// Create a file store from configuration.
    ///
    /// The upload root is made absolute here so every stored path is
    /// absolute regardless of later working-directory changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be made absolute.
    pub fn from_config(config: &IntakeConfig) -> Result<Self, StorageError> {
        let root = std::path::absolute(&config.upload_root).map_err(|source| {
            StorageError::InvalidRoot {
                path: config.upload_root.clone(),
                source,
            }
        })?;

        Ok(Self {
            root,
            write_timeout: Duration::from_secs(config.write_timeout_secs),
        })
    }

    /// Absolute upload root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds a namespace's files. Performs no I/O.
    #[must_use]
    pub fn destination_dir(&self, namespace: &Namespace) -> PathBuf {
        self.root.join(namespace.as_str()).join(UPLOADED_FILES_DIR)
    }

    /// Write one file into the namespace under a fresh generated name.
    ///
    /// The destination directory is created if missing; concurrent callers
    /// creating the same directory do not fail. The file is opened with
    /// `create_new`, so an existing file is never overwritten, and is synced
    /// to disk before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the write fails,
    /// or the write exceeds the configured timeout. A partially written
    /// file is removed before the error is returned.
    pub async fn store(
        &self,
        namespace: &Namespace,
        original_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError> {
        self.store_with_names(namespace, original_name, content, generate_filename)
            .await
    }

    /// [`FileStore::store`] with the name generator supplied by the caller.
    async fn store_with_names(
        &self,
        namespace: &Namespace,
        original_name: &str,
        content: &[u8],
        mut next_name: impl FnMut(&str) -> String,
    ) -> Result<StoredFile, StorageError> {
        let dir = self.destination_dir(namespace);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = next_name(original_name);
            let path = dir.join(&filename);

            match self.bounded(&path, write_new(&path, content)).await? {
                Ok(()) => {
                    debug!(path = %path.display(), size = content.len(), "File stored");
                    return Ok(StoredFile {
                        filename,
                        path,
                        size: u64::try_from(content.len()).unwrap_or(u64::MAX),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(path = %path.display(), "Generated filename already taken, retrying");
                }
                Err(source) => return Err(StorageError::Write { path, source }),
            }
        }

        Err(StorageError::NameExhausted {
            filename: original_name.to_string(),
        })
    }

    /// Run one write under the configured timeout.
    ///
    /// When the timeout expires whatever reached `path` is removed.
    async fn bounded(
        &self,
        path: &Path,
        write: impl Future<Output = io::Result<()>>,
    ) -> Result<io::Result<()>, StorageError> {
        if let Ok(result) = tokio::time::timeout(self.write_timeout, write).await {
            return Ok(result);
        }

        discard_partial(path).await;
        Err(StorageError::Timeout {
            path: path.to_path_buf(),
            secs: self.write_timeout.as_secs(),
        })
    }
}

/// Create `path` exclusively and write `content` to it.
///
/// Removes the file again if anything after creation fails.
async fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(content).await?;
        file.sync_all().await
    }
    .await;

    if written.is_err() {
        drop(file);
        discard_partial(path).await;
    }
    written
}

async fn discard_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => warn!(path = %path.display(), "Removed partially written file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial file"),
    }
}

/// Build `<timestamp>-<suffix>-<sanitized original name>`.
///
/// The timestamp is strictly increasing within the process and the suffix
/// is random, so names stay unique across concurrent submissions and
/// processes sharing the same root.
fn generate_filename(original_name: &str) -> String {
    let timestamp = next_timestamp_ms();
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{timestamp}-{}-{}",
        &suffix[..8],
        sanitize_filename(original_name)
    )
}

/// Current time in milliseconds, bumped past the last value handed out.
fn next_timestamp_ms() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_TIMESTAMP_MS
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    now.max(previous.saturating_add(1))
}

/// Sanitize filename for storage.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and
/// underscores. Long names keep their tail so the extension survives.
fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        return "file".to_string();
    }
    let start = sanitized.len().saturating_sub(MAX_ORIGINAL_NAME_LEN);
    sanitized[start..].to_string()
}
