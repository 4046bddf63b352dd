//! Permission service
//!
//! Group assignment is a full recomputation: the user's direct permissions
//! become exactly the union of their groups' permissions.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;
use tripdesk_common::Clock;
use tripdesk_domain::{Permission, PermissionGrant, Result, Role, TripDeskError};
use uuid::Uuid;

use super::ports::PermissionRepository;
use crate::user::ports::UserDirectory;

pub struct PermissionService {
    permissions: Arc<dyn PermissionRepository>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl PermissionService {
    pub fn new(
        permissions: Arc<dyn PermissionRepository>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { permissions, users, clock }
    }

    /// Set the user's groups and replace their direct permissions with the
    /// union of the groups' permissions. Returns the resulting set.
    pub async fn sync_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        granted_by: Option<Uuid>,
    ) -> Result<BTreeSet<Permission>> {
        let groups = self.permissions.find_groups(group_ids).await?;
        if groups.len() != group_ids.iter().collect::<BTreeSet<_>>().len() {
            return Err(TripDeskError::NotFound("One or more permission groups".to_string()));
        }

        let union: BTreeSet<Permission> =
            groups.iter().flat_map(|group| group.permissions.iter().cloned()).collect();
        let granted_at = self.clock.now();
        let grants: Vec<PermissionGrant> = union
            .iter()
            .map(|permission| PermissionGrant {
                permission: permission.clone(),
                granted_by,
                granted_at,
            })
            .collect();

        self.permissions.sync_user_groups(user_id, group_ids, &grants).await?;

        info!(user_id = %user_id, groups = groups.len(), permissions = union.len(), "Permission groups synced");
        Ok(union)
    }

    pub async fn grant(
        &self,
        user_id: Uuid,
        permission: Permission,
        granted_by: Option<Uuid>,
    ) -> Result<()> {
        let grant = PermissionGrant { permission, granted_by, granted_at: self.clock.now() };
        self.permissions.grant(user_id, &grant).await
    }

    pub async fn revoke(&self, user_id: Uuid, permission: &Permission) -> Result<bool> {
        self.permissions.revoke(user_id, permission).await
    }

    pub async fn permissions_of(&self, user_id: Uuid) -> Result<BTreeSet<Permission>> {
        let grants = self.permissions.direct_permissions(user_id).await?;
        Ok(grants.into_iter().map(|grant| grant.permission).collect())
    }

    /// Admins pass every check; inactive users fail every check.
    pub async fn has_permission(&self, user_id: Uuid, permission: &Permission) -> Result<bool> {
        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(|| TripDeskError::not_found("user", user_id))?;

        if !user.is_active {
            return Ok(false);
        }
        if user.role == Role::Admin {
            return Ok(true);
        }
        Ok(self.permissions_of(user_id).await?.contains(permission))
    }
}
