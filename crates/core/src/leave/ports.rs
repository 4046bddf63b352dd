//! Leave persistence port

use async_trait::async_trait;
use tripdesk_domain::{DateSpan, Leave, LeaveStatus, Result};
use uuid::Uuid;

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn insert(&self, leave: &Leave) -> Result<()>;

    /// Overwrites the stored row (last write wins).
    async fn update(&self, leave: &Leave) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Leave>>;

    /// Leaves of `user_id` in one of `statuses` whose day range overlaps
    /// `span`.
    async fn find_overlapping(
        &self,
        user_id: Uuid,
        statuses: &[LeaveStatus],
        span: DateSpan,
    ) -> Result<Vec<Leave>>;
}
