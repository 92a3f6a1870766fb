//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{FolioResult, User};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_user_id(&self, user_id: &str) -> FolioResult<Option<User>> {
        debug!("Finding user by id: {}", user_id);

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, created_at FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: &User) -> FolioResult<()> {
        debug!("Creating user: {}", user.user_id);

        // Duplicate keys surface as `Conflict` through `From<sqlx::Error>`.
        sqlx::query("INSERT INTO users (user_id, created_at) VALUES (?, ?)")
            .bind(&user.user_id)
            .bind(user.created_at)
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
