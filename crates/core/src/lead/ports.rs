//! Lead persistence and attachment storage ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tripdesk_domain::{Attachment, AttachmentStorage, Lead, Result};
use uuid::Uuid;

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: &Lead) -> Result<()>;

    /// Overwrites the stored row (last write wins).
    async fn update(&self, lead: &Lead) -> Result<()>;

    /// Soft-deleted leads are not returned.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>>;

    async fn reference_exists(&self, reference: &str) -> Result<bool>;

    /// Returns `false` when no live lead matched.
    async fn soft_delete(&self, id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool>;
}

/// Attachment metadata rows.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn insert(&self, attachment: &Attachment) -> Result<()>;

    async fn list_for_lead(&self, lead_id: Uuid) -> Result<Vec<Attachment>>;

    async fn list_by_storage(&self, storage: AttachmentStorage) -> Result<Vec<Attachment>>;

    async fn set_storage(&self, id: Uuid, storage: AttachmentStorage, path: &str) -> Result<()>;
}

/// Object storage for attachment bytes, addressed by store-relative keys.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object. Returns the
    /// stored size.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<u64>;

    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    async fn exists(&self, key: &str) -> Result<bool>;
}
