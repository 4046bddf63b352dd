//! User directory port

use async_trait::async_trait;
use tripdesk_domain::{Result, Role, User};
use uuid::Uuid;

/// Read access to users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Active users with `role`, in a stable order.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>>;

    /// Every user, active or not.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Manager of `user`: the first active user with the same role, the
    /// manager flag and a different id.
    async fn resolve_manager(&self, user: &User) -> Result<Option<User>> {
        let peers = self.list_by_role(user.role).await?;
        Ok(peers.into_iter().find(|peer| peer.manages(user)))
    }
}
