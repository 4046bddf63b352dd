//! Integration tests for the storage module
//!
//! These tests verify end-to-end pool behaviour:
//! - Data written through one pool is visible to a pool reopened on the file
//! - Pragmas (foreign keys) are applied to every pooled connection
//! - Error classification of storage failures

#![cfg(feature = "storage")]

use std::path::Path;

use tempfile::TempDir;
use tripdesk_common::error::{ErrorClassification, ErrorSeverity};
use tripdesk_common::storage::{SqlitePool, SqlitePoolConfig, StorageError};

fn open(path: &Path, max_size: u32) -> SqlitePool {
    SqlitePool::open(path, SqlitePoolConfig::with_max_size(max_size)).expect("pool should open")
}

#[test]
fn data_survives_reopening_the_pool() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("desk.db");

    {
        let pool = open(&path, 2);
        let conn = pool.get_connection().unwrap();
        conn.execute("CREATE TABLE leads (reference TEXT PRIMARY KEY)", &[]).unwrap();
        conn.execute("INSERT INTO leads (reference) VALUES (?1)", &[&"LD-20240101-AAAA"]).unwrap();
    }

    let pool = open(&path, 1);
    let conn = pool.get_connection().unwrap();
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM leads", &[], |row| row.get(0)).unwrap();
    assert_eq!(count, 1);

    let missing: Option<String> = conn
        .query_optional(
            "SELECT reference FROM leads WHERE reference = ?1",
            &[&"LD-19990101-ZZZZ"],
            |row| row.get(0),
        )
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn every_connection_enforces_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let pool = open(&dir.path().join("fk.db"), 3);

    let setup = pool.get_connection().unwrap();
    setup
        .inner()
        .execute_batch(
            "CREATE TABLE users (id TEXT PRIMARY KEY);
             CREATE TABLE leaves (id TEXT PRIMARY KEY, user_id TEXT NOT NULL REFERENCES users(id));",
        )
        .unwrap();

    let other = pool.get_connection().unwrap();
    let err = other
        .execute("INSERT INTO leaves (id, user_id) VALUES ('l1', 'nobody')", &[])
        .unwrap_err();

    assert!(matches!(err, StorageError::Rusqlite(_)));
    assert!(!err.is_retryable());
    assert_eq!(err.severity(), ErrorSeverity::Error);
}

#[test]
fn health_check_reports_pool_size() {
    let dir = TempDir::new().unwrap();
    let pool = open(&dir.path().join("health.db"), 0);

    let status = pool.health_check();
    assert!(status.healthy);
    assert_eq!(status.max_size, 1, "pool size is clamped to at least one");
}
