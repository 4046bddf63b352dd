//! SQLite-backed lead and attachment repositories.
//!
//! Lead rows store the main status and the four service statuses as raw
//! vocabulary keys. Updates overwrite the whole row (last write wins).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tripdesk_common::storage::{SqliteConnection, StorageResult};
use tripdesk_core::{AttachmentRepository, LeadRepository};
use tripdesk_domain::{
    Attachment, AttachmentStorage, Lead, Result as DomainResult, ServiceStatuses, TripDeskError,
};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const LEAD_COLUMNS: &str = "id, reference, customer_name, contact_method, contact_value, \
     platform, destination, travel_start, travel_end, adults, children, infants, status, \
     priority, air_ticket_status, hotel_status, visa_status, land_package_status, \
     assigned_to, assigned_operator, created_by, created_at, updated_at, deleted_at";

pub struct SqliteLeadRepository {
    db: Arc<DbManager>,
}

impl SqliteLeadRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Live lead by reference, used by the cost migration.
    pub async fn find_by_reference(&self, reference: &str) -> DomainResult<Option<Lead>> {
        let reference = reference.to_string();
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!(
                        "SELECT {LEAD_COLUMNS} FROM leads WHERE reference = ?1 AND deleted_at IS NULL"
                    ),
                    params![reference],
                    map_lead,
                )
                .map_err(to_domain)
            })
            .await
    }
}

#[async_trait]
impl LeadRepository for SqliteLeadRepository {
    async fn insert(&self, lead: &Lead) -> DomainResult<()> {
        let lead = lead.clone();
        self.db
            .with_connection(move |conn| {
                write_lead(
                    conn,
                    &format!(
                        "INSERT INTO leads ({LEAD_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                                 ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)"
                    ),
                    &lead,
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, lead: &Lead) -> DomainResult<()> {
        let lead = lead.clone();
        self.db
            .with_connection(move |conn| {
                let changed = write_lead(
                    conn,
                    "UPDATE leads SET
                        reference = ?2, customer_name = ?3, contact_method = ?4,
                        contact_value = ?5, platform = ?6, destination = ?7,
                        travel_start = ?8, travel_end = ?9, adults = ?10, children = ?11,
                        infants = ?12, status = ?13, priority = ?14,
                        air_ticket_status = ?15, hotel_status = ?16, visa_status = ?17,
                        land_package_status = ?18, assigned_to = ?19,
                        assigned_operator = ?20, created_by = ?21, created_at = ?22,
                        updated_at = ?23, deleted_at = ?24
                     WHERE id = ?1",
                    &lead,
                )
                .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("lead", lead.id));
                }
                Ok(())
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Lead>> {
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!(
                        "SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1 AND deleted_at IS NULL"
                    ),
                    params![id.to_string()],
                    map_lead,
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn reference_exists(&self, reference: &str) -> DomainResult<bool> {
        let reference = reference.to_string();
        self.db
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM leads WHERE reference = ?1)",
                    params![reference],
                    |row| codec::bool_flag(row, 0),
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn soft_delete(&self, id: Uuid, deleted_at: DateTime<Utc>) -> DomainResult<bool> {
        self.db
            .with_connection(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE leads SET deleted_at = ?2, updated_at = ?2
                         WHERE id = ?1 AND deleted_at IS NULL",
                        params![id.to_string(), codec::timestamp_text(deleted_at)],
                    )
                    .map_err(to_domain)?;
                Ok(changed > 0)
            })
            .await
    }
}

fn write_lead(conn: &SqliteConnection, sql: &str, lead: &Lead) -> StorageResult<usize> {
    conn.execute(
        sql,
        params![
            lead.id.to_string(),
            lead.reference,
            lead.customer_name,
            lead.contact_method,
            lead.contact_value,
            lead.platform.map(|platform| platform.as_str()),
            lead.destination,
            lead.travel_start.map(codec::date_text),
            lead.travel_end.map(codec::date_text),
            lead.adults,
            lead.children,
            lead.infants,
            lead.status.as_str(),
            lead.priority.as_str(),
            lead.services.air_ticket.as_str(),
            lead.services.hotel.as_str(),
            lead.services.visa.as_str(),
            lead.services.land_package.as_str(),
            lead.assigned_to.map(|id| id.to_string()),
            lead.assigned_operator.map(|id| id.to_string()),
            lead.created_by.to_string(),
            codec::timestamp_text(lead.created_at),
            codec::timestamp_text(lead.updated_at),
            lead.deleted_at.map(codec::timestamp_text),
        ],
    )
}

fn map_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: codec::uuid(row, 0)?,
        reference: row.get(1)?,
        customer_name: row.get(2)?,
        contact_method: row.get(3)?,
        contact_value: row.get(4)?,
        platform: codec::opt_known(row, 5)?,
        destination: row.get(6)?,
        travel_start: codec::opt_date(row, 7)?,
        travel_end: codec::opt_date(row, 8)?,
        adults: row.get(9)?,
        children: row.get(10)?,
        infants: row.get(11)?,
        status: codec::recorded(row, 12)?,
        priority: codec::known(row, 13)?,
        services: ServiceStatuses {
            air_ticket: codec::recorded(row, 14)?,
            hotel: codec::recorded(row, 15)?,
            visa: codec::recorded(row, 16)?,
            land_package: codec::recorded(row, 17)?,
        },
        assigned_to: codec::opt_uuid(row, 18)?,
        assigned_operator: codec::opt_uuid(row, 19)?,
        created_by: codec::uuid(row, 20)?,
        created_at: codec::timestamp(row, 21)?,
        updated_at: codec::timestamp(row, 22)?,
        deleted_at: codec::opt_timestamp(row, 23)?,
    })
}

// ============================================================================
// Attachments
// ============================================================================

const ATTACHMENT_COLUMNS: &str =
    "id, lead_id, original_name, path, storage, size_bytes, created_at";

pub struct SqliteAttachmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAttachmentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn list_where(&self, clause: &'static str, value: String) -> DomainResult<Vec<Attachment>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE {clause}
                         ORDER BY created_at, id"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![value], map_attachment).map_err(to_domain)
            })
            .await
    }
}

#[async_trait]
impl AttachmentRepository for SqliteAttachmentRepository {
    async fn insert(&self, attachment: &Attachment) -> DomainResult<()> {
        let attachment = attachment.clone();
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO attachments ({ATTACHMENT_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                    ),
                    params![
                        attachment.id.to_string(),
                        attachment.lead_id.to_string(),
                        attachment.original_name,
                        attachment.path,
                        attachment.storage.to_string(),
                        attachment.size_bytes as i64,
                        codec::timestamp_text(attachment.created_at),
                    ],
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<Attachment>> {
        self.list_where("lead_id = ?1", lead_id.to_string()).await
    }

    async fn list_by_storage(&self, storage: AttachmentStorage) -> DomainResult<Vec<Attachment>> {
        self.list_where("storage = ?1", storage.to_string()).await
    }

    async fn set_storage(
        &self,
        id: Uuid,
        storage: AttachmentStorage,
        path: &str,
    ) -> DomainResult<()> {
        let path = path.to_string();
        self.db
            .with_connection(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE attachments SET storage = ?2, path = ?3 WHERE id = ?1",
                        params![id.to_string(), storage.to_string(), path],
                    )
                    .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("attachment", id));
                }
                Ok(())
            })
            .await
    }
}

fn map_attachment(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: codec::uuid(row, 0)?,
        lead_id: codec::uuid(row, 1)?,
        original_name: row.get(2)?,
        path: row.get(3)?,
        storage: codec::known(row, 4)?,
        size_bytes: u64::try_from(row.get::<_, i64>(5)?).unwrap_or_default(),
        created_at: codec::timestamp(row, 6)?,
    })
}
