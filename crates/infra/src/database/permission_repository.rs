//! SQLite-backed permission groups and direct grants.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tripdesk_core::PermissionRepository;
use tripdesk_domain::{Permission, PermissionGrant, PermissionGroup, Result as DomainResult};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

pub struct SqlitePermissionRepository {
    db: Arc<DbManager>,
}

impl SqlitePermissionRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Create or replace a group and its permission set.
    pub async fn save_group(&self, group: &PermissionGroup) -> DomainResult<()> {
        let group = group.clone();
        self.db
            .with_transaction(move |tx| {
                tx.execute(
                    "INSERT INTO permission_groups (id, name) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET name = excluded.name",
                    params![group.id.to_string(), group.name],
                )
                .map_err(to_domain)?;
                tx.execute(
                    "DELETE FROM group_permissions WHERE group_id = ?1",
                    params![group.id.to_string()],
                )
                .map_err(to_domain)?;
                for permission in &group.permissions {
                    tx.execute(
                        "INSERT INTO group_permissions (group_id, permission) VALUES (?1, ?2)",
                        params![group.id.to_string(), permission.as_str()],
                    )
                    .map_err(to_domain)?;
                }
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl PermissionRepository for SqlitePermissionRepository {
    async fn find_groups(&self, ids: &[Uuid]) -> DomainResult<Vec<PermissionGroup>> {
        let ids = ids.to_vec();
        self.db
            .with_connection(move |conn| {
                let mut groups = Vec::with_capacity(ids.len());
                for id in ids {
                    let name: Option<String> = conn
                        .query_optional(
                            "SELECT name FROM permission_groups WHERE id = ?1",
                            params![id.to_string()],
                            |row| row.get(0),
                        )
                        .map_err(to_domain)?;
                    let Some(name) = name else { continue };

                    let mut stmt = conn
                        .prepare(
                            "SELECT permission FROM group_permissions
                             WHERE group_id = ?1 ORDER BY permission",
                        )
                        .map_err(to_domain)?;
                    let permissions: Vec<String> = stmt
                        .query_map(params![id.to_string()], |row| row.get(0))
                        .map_err(to_domain)?;

                    groups.push(PermissionGroup {
                        id,
                        name,
                        permissions: permissions.into_iter().map(Permission).collect::<BTreeSet<_>>(),
                    });
                }
                Ok(groups)
            })
            .await
    }

    async fn user_groups(&self, user_id: Uuid) -> DomainResult<Vec<Uuid>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare("SELECT group_id FROM user_groups WHERE user_id = ?1 ORDER BY group_id")
                    .map_err(to_domain)?;
                stmt.query_map(params![user_id.to_string()], |row| codec::uuid(row, 0))
                    .map_err(to_domain)
            })
            .await
    }

    async fn sync_user_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        grants: &[PermissionGrant],
    ) -> DomainResult<()> {
        let group_ids = group_ids.to_vec();
        let grants = grants.to_vec();
        self.db
            .with_transaction(move |tx| {
                write_user_groups(tx, user_id, &group_ids).map_err(to_domain)?;
                write_direct_permissions(tx, user_id, &grants).map_err(to_domain)
            })
            .await
    }

    async fn direct_permissions(&self, user_id: Uuid) -> DomainResult<Vec<PermissionGrant>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT permission, granted_by, granted_at FROM user_permissions
                         WHERE user_id = ?1 ORDER BY permission",
                    )
                    .map_err(to_domain)?;
                stmt.query_map(params![user_id.to_string()], |row| {
                    Ok(PermissionGrant {
                        permission: Permission(row.get(0)?),
                        granted_by: codec::opt_uuid(row, 1)?,
                        granted_at: codec::timestamp(row, 2)?,
                    })
                })
                .map_err(to_domain)
            })
            .await
    }

    async fn replace_direct_permissions(
        &self,
        user_id: Uuid,
        grants: &[PermissionGrant],
    ) -> DomainResult<()> {
        let grants = grants.to_vec();
        self.db
            .with_transaction(move |tx| {
                write_direct_permissions(tx, user_id, &grants).map_err(to_domain)
            })
            .await
    }

    async fn grant(&self, user_id: Uuid, grant: &PermissionGrant) -> DomainResult<()> {
        let grant = grant.clone();
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    "INSERT INTO user_permissions (user_id, permission, granted_by, granted_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(user_id, permission) DO UPDATE SET
                        granted_by = excluded.granted_by,
                        granted_at = excluded.granted_at",
                    params![
                        user_id.to_string(),
                        grant.permission.as_str(),
                        grant.granted_by.map(|id| id.to_string()),
                        codec::timestamp_text(grant.granted_at),
                    ],
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    async fn revoke(&self, user_id: Uuid, permission: &Permission) -> DomainResult<bool> {
        let permission = permission.clone();
        self.db
            .with_connection(move |conn| {
                let removed = conn
                    .execute(
                        "DELETE FROM user_permissions WHERE user_id = ?1 AND permission = ?2",
                        params![user_id.to_string(), permission.as_str()],
                    )
                    .map_err(to_domain)?;
                Ok(removed > 0)
            })
            .await
    }
}

fn write_user_groups(conn: &Connection, user_id: Uuid, group_ids: &[Uuid]) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM user_groups WHERE user_id = ?1", params![user_id.to_string()])?;
    for group_id in group_ids {
        conn.execute(
            "INSERT OR IGNORE INTO user_groups (user_id, group_id) VALUES (?1, ?2)",
            params![user_id.to_string(), group_id.to_string()],
        )?;
    }
    Ok(())
}

fn write_direct_permissions(
    conn: &Connection,
    user_id: Uuid,
    grants: &[PermissionGrant],
) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM user_permissions WHERE user_id = ?1", params![user_id.to_string()])?;
    for grant in grants {
        conn.execute(
            "INSERT OR REPLACE INTO user_permissions
                (user_id, permission, granted_by, granted_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id.to_string(),
                grant.permission.as_str(),
                grant.granted_by.map(|id| id.to_string()),
                codec::timestamp_text(grant.granted_at),
            ],
        )?;
    }
    Ok(())
}
