//! SQLite-backed user directory.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use tripdesk_core::UserDirectory;
use tripdesk_domain::{Result as DomainResult, Role, User};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const USER_COLUMNS: &str = "id, name, email, role, is_manager, is_active";

pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or replace a user row.
    pub async fn save(&self, user: &User) -> DomainResult<()> {
        let user = user.clone();
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, email, role, is_manager, is_active)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        email = excluded.email,
                        role = excluded.role,
                        is_manager = excluded.is_manager,
                        is_active = excluded.is_active",
                    params![
                        user.id.to_string(),
                        user.name,
                        user.email,
                        user.role.as_str(),
                        user.is_manager,
                        user.is_active
                    ],
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl UserDirectory for SqliteUserRepository {
    async fn find_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    params![id.to_string()],
                    map_user,
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn list_by_role(&self, role: Role) -> DomainResult<Vec<User>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {USER_COLUMNS} FROM users
                         WHERE role = ?1 AND is_active = 1
                         ORDER BY name, id"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![role.as_str()], map_user).map_err(to_domain)
            })
            .await
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.db
            .with_connection(|conn| {
                let mut stmt = conn
                    .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name, id"))
                    .map_err(to_domain)?;
                stmt.query_map(params![], map_user).map_err(to_domain)
            })
            .await
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: codec::uuid(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: codec::known(row, 3)?,
        is_manager: codec::bool_flag(row, 4)?,
        is_active: codec::bool_flag(row, 5)?,
    })
}
