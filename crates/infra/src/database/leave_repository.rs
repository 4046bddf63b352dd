//! SQLite-backed leave repository.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use tripdesk_common::storage::{SqliteConnection, StorageResult};
use tripdesk_core::LeaveRepository;
use tripdesk_domain::{DateSpan, Leave, LeaveStatus, Result as DomainResult, TripDeskError};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const LEAVE_COLUMNS: &str = "id, user_id, leave_type, status, start_date, end_date, reason, \
     rejection_reason, approved_by, approved_at, created_at, updated_at";

pub struct SqliteLeaveRepository {
    db: Arc<DbManager>,
}

impl SqliteLeaveRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeaveRepository for SqliteLeaveRepository {
    async fn insert(&self, leave: &Leave) -> DomainResult<()> {
        let leave = leave.clone();
        self.db
            .with_connection(move |conn| {
                write_leave(
                    conn,
                    &format!(
                        "INSERT INTO leaves ({LEAVE_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
                    ),
                    &leave,
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, leave: &Leave) -> DomainResult<()> {
        let leave = leave.clone();
        self.db
            .with_connection(move |conn| {
                let changed = write_leave(
                    conn,
                    "UPDATE leaves SET
                        user_id = ?2, leave_type = ?3, status = ?4, start_date = ?5,
                        end_date = ?6, reason = ?7, rejection_reason = ?8, approved_by = ?9,
                        approved_at = ?10, created_at = ?11, updated_at = ?12
                     WHERE id = ?1",
                    &leave,
                )
                .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("leave", leave.id));
                }
                Ok(())
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Leave>> {
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!("SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = ?1"),
                    params![id.to_string()],
                    map_leave,
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn find_overlapping(
        &self,
        user_id: Uuid,
        statuses: &[LeaveStatus],
        span: DateSpan,
    ) -> DomainResult<Vec<Leave>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        // Status keys are a closed vocabulary, so inlining them is safe.
        let status_list =
            statuses.iter().map(|status| format!("'{}'", status.as_str())).collect::<Vec<_>>().join(", ");

        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {LEAVE_COLUMNS} FROM leaves
                         WHERE user_id = ?1
                           AND status IN ({status_list})
                           AND start_date <= ?3
                           AND end_date >= ?2
                         ORDER BY start_date, id"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(
                    params![
                        user_id.to_string(),
                        codec::date_text(span.start),
                        codec::date_text(span.end)
                    ],
                    map_leave,
                )
                .map_err(to_domain)
            })
            .await
    }
}

fn write_leave(conn: &SqliteConnection, sql: &str, leave: &Leave) -> StorageResult<usize> {
    conn.execute(
        sql,
        params![
            leave.id.to_string(),
            leave.user_id.to_string(),
            leave.leave_type.as_str(),
            leave.status.as_str(),
            codec::date_text(leave.start_date),
            codec::date_text(leave.end_date),
            leave.reason,
            leave.rejection_reason,
            leave.approved_by.map(|id| id.to_string()),
            leave.approved_at.map(codec::timestamp_text),
            codec::timestamp_text(leave.created_at),
            codec::timestamp_text(leave.updated_at),
        ],
    )
}

fn map_leave(row: &Row<'_>) -> rusqlite::Result<Leave> {
    Ok(Leave {
        id: codec::uuid(row, 0)?,
        user_id: codec::uuid(row, 1)?,
        leave_type: codec::known(row, 2)?,
        status: codec::known(row, 3)?,
        start_date: codec::date(row, 4)?,
        end_date: codec::date(row, 5)?,
        reason: row.get(6)?,
        rejection_reason: row.get(7)?,
        approved_by: codec::opt_uuid(row, 8)?,
        approved_at: codec::opt_timestamp(row, 9)?,
        created_at: codec::timestamp(row, 10)?,
        updated_at: codec::timestamp(row, 11)?,
    })
}
