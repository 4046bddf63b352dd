//! Storage primitives for the relational store
//!
//! Provides an r2d2-backed SQLite pool, a pooled connection wrapper and the
//! storage error type. Schema management belongs to the infrastructure crate.

pub mod config;
pub mod error;
pub mod sqlite;

// Re-export commonly used types
pub use config::SqlitePoolConfig;
pub use error::{StorageError, StorageResult};
pub use sqlite::{
    apply_connection_pragmas, HealthStatus, SqliteConnection, SqlitePool, SqliteStatement,
};
