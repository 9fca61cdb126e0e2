//! Core business logic for the intake service.
//!
//! This crate contains the ingestion pipeline with ZERO web or database
//! dependencies. Validation rules, namespace derivation, file storage and the
//! coordinator that ties them together live here.
//!
//! # Modules
//!
//! - `intake` - Submission types, validation, and the ingestion coordinator
//! - `storage` - Durable filesystem storage for attached files

pub mod intake;
pub mod storage;
