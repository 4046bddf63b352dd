//! SQLite-backed notification inbox.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tripdesk_core::NotificationStore;
use tripdesk_domain::{
    BadgeColor, Notification, NotificationType, Result as DomainResult, Vocabulary,
};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const NOTIFICATION_COLUMNS: &str = "id, user_id, notification_type, title, body, color, icon, \
     action_url, lead_id, read_at, created_at";

pub struct SqliteNotificationStore {
    db: Arc<DbManager>,
}

impl SqliteNotificationStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
    async fn store(&self, notification: &Notification) -> DomainResult<()> {
        let n = notification.clone();
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT INTO notifications ({NOTIFICATION_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                    ),
                    params![
                        n.id.to_string(),
                        n.user_id.to_string(),
                        n.notification_type.as_str(),
                        n.title,
                        n.body,
                        n.color.as_str(),
                        n.icon,
                        n.action_url,
                        n.lead_id.map(|id| id.to_string()),
                        n.read_at.map(codec::timestamp_text),
                        codec::timestamp_text(n.created_at),
                    ],
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn list_for(&self, user_id: Uuid, unread_only: bool) -> DomainResult<Vec<Notification>> {
        self.db
            .with_connection(move |conn| {
                let unread_clause = if unread_only { "AND read_at IS NULL" } else { "" };
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                         WHERE user_id = ?1 {unread_clause}
                         ORDER BY created_at DESC, rowid DESC"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![user_id.to_string()], map_notification).map_err(to_domain)
            })
            .await
    }

    async fn mark_read(&self, notification_id: Uuid, read_at: DateTime<Utc>) -> DomainResult<bool> {
        self.db
            .with_connection(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE notifications SET read_at = ?2 WHERE id = ?1 AND read_at IS NULL",
                        params![notification_id.to_string(), codec::timestamp_text(read_at)],
                    )
                    .map_err(to_domain)?;
                Ok(changed > 0)
            })
            .await
    }

    async fn mark_all_read(&self, user_id: Uuid, read_at: DateTime<Utc>) -> DomainResult<usize> {
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    "UPDATE notifications SET read_at = ?2 WHERE user_id = ?1 AND read_at IS NULL",
                    params![user_id.to_string(), codec::timestamp_text(read_at)],
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn unread_counts(&self, user_id: Uuid) -> DomainResult<BTreeMap<NotificationType, u64>> {
        let rows: Vec<(String, i64)> = self
            .db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT notification_type, COUNT(*) FROM notifications
                         WHERE user_id = ?1 AND read_at IS NULL
                         GROUP BY notification_type",
                    )
                    .map_err(to_domain)?;
                stmt.query_map(params![user_id.to_string()], |row| Ok((row.get(0)?, row.get(1)?)))
                    .map_err(to_domain)
            })
            .await?;

        // Rows with a type outside the vocabulary are not reported.
        Ok(rows
            .into_iter()
            .filter_map(|(key, count)| {
                NotificationType::from_key(&key).map(|kind| (kind, u64::try_from(count).unwrap_or(0)))
            })
            .collect())
    }
}

fn map_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let color: String = row.get(5)?;
    Ok(Notification {
        id: codec::uuid(row, 0)?,
        user_id: codec::uuid(row, 1)?,
        notification_type: codec::known(row, 2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        color: badge_color(&color),
        icon: row.get(6)?,
        action_url: row.get(7)?,
        lead_id: codec::opt_uuid(row, 8)?,
        read_at: codec::opt_timestamp(row, 9)?,
        created_at: codec::timestamp(row, 10)?,
    })
}

fn badge_color(raw: &str) -> BadgeColor {
    match raw {
        "info" => BadgeColor::Info,
        "primary" => BadgeColor::Primary,
        "warning" => BadgeColor::Warning,
        "success" => BadgeColor::Success,
        "danger" => BadgeColor::Danger,
        _ => BadgeColor::Gray,
    }
}
