//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Submission intake configuration.
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Submission intake configuration.
///
/// Built once at startup and shared with every pipeline component.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Root directory under which submitter namespaces are created.
    pub upload_root: PathBuf,
    /// Maximum number of files per submission.
    pub max_files: usize,
    /// Maximum size of a single file in bytes.
    pub max_file_size: u64,
    /// Declared MIME types accepted for upload.
    pub allowed_mime_types: Vec<String>,
    /// Upper bound on a single file write, in seconds.
    pub write_timeout_secs: u64,
    /// Upper bound on the metadata store round trip, in seconds.
    pub record_timeout_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from(Self::DEFAULT_UPLOAD_ROOT),
            max_files: Self::DEFAULT_MAX_FILES,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
            write_timeout_secs: Self::DEFAULT_WRITE_TIMEOUT,
            record_timeout_secs: Self::DEFAULT_RECORD_TIMEOUT,
        }
    }
}

impl IntakeConfig {
    /// Default upload root, relative to the working directory.
    pub const DEFAULT_UPLOAD_ROOT: &'static str = "uploads";
    /// Default maximum number of files per submission.
    pub const DEFAULT_MAX_FILES: usize = 5;
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// Default file write timeout: 30 seconds.
    pub const DEFAULT_WRITE_TIMEOUT: u64 = 30;
    /// Default metadata write timeout: 10 seconds.
    pub const DEFAULT_RECORD_TIMEOUT: u64 = 10;

    /// Create a config rooted at the given upload directory with default limits.
    #[must_use]
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            ..Self::default()
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set maximum number of files per submission.
    #[must_use]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// Set the per-file write timeout.
    #[must_use]
    pub fn with_write_timeout(mut self, secs: u64) -> Self {
        self.write_timeout_secs = secs;
        self
    }

    /// Set the metadata write timeout.
    #[must_use]
    pub fn with_record_timeout(mut self, secs: u64) -> Self {
        self.record_timeout_secs = secs;
        self
    }

    /// Default allowed MIME types: PDF, DOC, DOCX, XLS, XLSX and CSV.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "application/pdf".to_string(),
            "application/msword".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
            "application/vnd.ms-excel".to_string(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            "text/csv".to_string(),
        ]
    }

    /// Check if a MIME type is allowed.
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the essence is
    /// compared case-insensitively.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        self.allowed_mime_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(essence))
    }

    /// Upper bound on a whole request body: every file at the cap plus
    /// 1 MiB for the text fields and multipart framing.
    #[must_use]
    pub fn max_body_size(&self) -> usize {
        let per_file = usize::try_from(self.max_file_size).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.max_files)
            .saturating_add(1024 * 1024)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("INTAKE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("intake.allowed_mime_types")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
