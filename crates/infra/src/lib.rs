//! # TripDesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for every core port, plus the schema
//! - Configuration loading (environment and TOML/JSON files)
//! - Filesystem attachment store
//! - One-shot data migration jobs
//!
//! ## Architecture
//! - Implements traits defined in `tripdesk-core`
//! - Depends on `tripdesk-common`, `tripdesk-domain` and `tripdesk-core`
//! - Contains all "impure" code (SQLite, filesystem)

pub mod attachments;
pub mod config;
pub mod database;
pub mod errors;
pub mod jobs;

// Re-export commonly used items
pub use attachments::LocalAttachmentStore;
pub use database::*;
pub use errors::InfraError;
pub use jobs::{JobOptions, JobSummary};
