//! Shared errors and configuration for the intake service.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types and their HTTP mapping
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, DatabaseConfig, IntakeConfig, ServerConfig};
pub use error::{AppError, AppResult};
