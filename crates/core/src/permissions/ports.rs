//! Permission persistence port

use async_trait::async_trait;
use tripdesk_domain::{Permission, PermissionGrant, PermissionGroup, Result};
use uuid::Uuid;

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Groups with the given ids; unknown ids are skipped.
    async fn find_groups(&self, ids: &[Uuid]) -> Result<Vec<PermissionGroup>>;

    async fn user_groups(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Replace the user's group memberships and direct permissions together;
    /// either both writes land or neither does.
    async fn sync_user_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        grants: &[PermissionGrant],
    ) -> Result<()>;

    async fn direct_permissions(&self, user_id: Uuid) -> Result<Vec<PermissionGrant>>;

    /// Replace every direct permission row of the user in one transaction.
    async fn replace_direct_permissions(
        &self,
        user_id: Uuid,
        grants: &[PermissionGrant],
    ) -> Result<()>;

    /// Insert or refresh one direct permission row.
    async fn grant(&self, user_id: Uuid, grant: &PermissionGrant) -> Result<()>;

    /// Returns `false` when the user did not hold the permission.
    async fn revoke(&self, user_id: Uuid, permission: &Permission) -> Result<bool>;
}
