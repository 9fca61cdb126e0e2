//! Durable file storage for submission attachments.
//!
//! Files land on the local filesystem under a per-submitter namespace:
//!
//! ```text
//! <upload_root>/
//! └── <namespace>/
//!     └── uploaded_files/
//!         ├── 1735689600000-3f2a9c1e-quote.pdf
//!         └── 1735689600001-b71d04aa-budget.xlsx
//! ```
//!
//! Each write creates a new file exactly once; names are never reused.

mod error;
mod service;

pub use error::StorageError;
pub use service::{FileStore, UPLOADED_FILES_DIR};
