//! SQLite-backed call-center calls.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tripdesk_common::storage::{SqliteConnection, StorageResult};
use tripdesk_core::CallCenterRepository;
use tripdesk_domain::{CallCenterCall, Result as DomainResult, TripDeskError};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const CALL_COLUMNS: &str = "id, lead_id, call_type, agent_id, status, call_attempts, \
     call_checklist_completed, notes, created_at, updated_at";

pub struct SqliteCallCenterRepository {
    db: Arc<DbManager>,
}

impl SqliteCallCenterRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CallCenterRepository for SqliteCallCenterRepository {
    async fn insert(&self, call: &CallCenterCall) -> DomainResult<()> {
        let call = call.clone();
        self.db
            .with_connection(move |conn| {
                write_call(
                    conn,
                    &format!(
                        "INSERT INTO call_center_calls ({CALL_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                    ),
                    &call,
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, call: &CallCenterCall) -> DomainResult<()> {
        let call = call.clone();
        self.db
            .with_connection(move |conn| {
                let changed = write_call(
                    conn,
                    "UPDATE call_center_calls SET
                        lead_id = ?2, call_type = ?3, agent_id = ?4, status = ?5,
                        call_attempts = ?6, call_checklist_completed = ?7, notes = ?8,
                        created_at = ?9, updated_at = ?10
                     WHERE id = ?1",
                    &call,
                )
                .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("call", call.id));
                }
                Ok(())
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<CallCenterCall>> {
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!("SELECT {CALL_COLUMNS} FROM call_center_calls WHERE id = ?1"),
                    params![id.to_string()],
                    map_call,
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<CallCenterCall>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {CALL_COLUMNS} FROM call_center_calls
                         WHERE lead_id = ?1 ORDER BY created_at, id"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![lead_id.to_string()], map_call).map_err(to_domain)
            })
            .await
    }
}

fn write_call(conn: &SqliteConnection, sql: &str, call: &CallCenterCall) -> StorageResult<usize> {
    // A BTreeSet<String> always serializes.
    let checklist = serde_json::to_string(&call.call_checklist_completed).unwrap_or_else(|_| "[]".into());
    conn.execute(
        sql,
        params![
            call.id.to_string(),
            call.lead_id.to_string(),
            call.call_type.as_str(),
            call.agent_id.map(|id| id.to_string()),
            call.status.as_str(),
            call.call_attempts,
            checklist,
            call.notes,
            codec::timestamp_text(call.created_at),
            codec::timestamp_text(call.updated_at),
        ],
    )
}

fn map_call(row: &Row<'_>) -> rusqlite::Result<CallCenterCall> {
    let checklist: String = row.get(6)?;
    let call_checklist_completed: BTreeSet<String> = serde_json::from_str(&checklist)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;

    Ok(CallCenterCall {
        id: codec::uuid(row, 0)?,
        lead_id: codec::uuid(row, 1)?,
        call_type: codec::known(row, 2)?,
        agent_id: codec::opt_uuid(row, 3)?,
        status: codec::known(row, 4)?,
        call_attempts: row.get(5)?,
        call_checklist_completed,
        notes: row.get(7)?,
        created_at: codec::timestamp(row, 8)?,
        updated_at: codec::timestamp(row, 9)?,
    })
}
