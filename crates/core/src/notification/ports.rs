//! Notification inbox port

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tripdesk_domain::{Notification, NotificationType, Result};
use uuid::Uuid;

/// Per-user stored notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn store(&self, notification: &Notification) -> Result<()>;

    /// Newest first.
    async fn list_for(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>>;

    /// Returns `false` when the notification does not exist or was already
    /// read.
    async fn mark_read(&self, notification_id: Uuid, read_at: DateTime<Utc>) -> Result<bool>;

    /// Returns the number of notifications that changed.
    async fn mark_all_read(&self, user_id: Uuid, read_at: DateTime<Utc>) -> Result<usize>;

    /// Unread notifications per type. Types without unread entries are
    /// omitted.
    async fn unread_counts(&self, user_id: Uuid) -> Result<BTreeMap<NotificationType, u64>>;
}
