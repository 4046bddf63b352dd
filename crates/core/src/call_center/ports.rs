//! Call-center persistence port

use async_trait::async_trait;
use tripdesk_domain::{CallCenterCall, Result};
use uuid::Uuid;

#[async_trait]
pub trait CallCenterRepository: Send + Sync {
    async fn insert(&self, call: &CallCenterCall) -> Result<()>;

    async fn update(&self, call: &CallCenterCall) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CallCenterCall>>;

    async fn list_for_lead(&self, lead_id: Uuid) -> Result<Vec<CallCenterCall>>;
}
