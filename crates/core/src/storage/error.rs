//! Storage error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload root could not be resolved to an absolute path.
    #[error("invalid upload root {}: {source}", path.display())]
    InvalidRoot {
        /// Configured root.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Destination directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// File could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// File write did not finish in time.
    #[error("write to {} did not finish within {secs}s", path.display())]
    Timeout {
        /// Destination path.
        path: PathBuf,
        /// Configured timeout.
        secs: u64,
    },

    /// Every generated name was already taken.
    #[error("could not generate a unique name for '{filename}'")]
    NameExhausted {
        /// Original filename.
        filename: String,
    },
}
