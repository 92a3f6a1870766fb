//! MySQL revision repository implementation.

use crate::{traits::RevisionRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{FolioError, FolioResult, Revision, RevisionId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Component, Clone)]
#[shaku(interface = RevisionRepository)]
pub struct MySqlRevisionRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlRevisionRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RevisionRow {
    revision_id: String,
    article_id: String,
    version: u32,
    content: String,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RevisionRow> for Revision {
    type Error = FolioError;

    fn try_from(row: RevisionRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.revision_id)
            .map_err(|e| FolioError::Internal(format!("Invalid UUID in database: {}", e)))?;

        Ok(Revision {
            revision_id: RevisionId(id),
            article_id: row.article_id,
            version: row.version,
            content: row.content,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl RevisionRepository for MySqlRevisionRepository {
    async fn find_by_article(&self, article_id: &str) -> FolioResult<Vec<Revision>> {
        debug!("Finding revisions of article: {}", article_id);

        let rows = sqlx::query_as::<_, RevisionRow>(
            r#"
            SELECT revision_id, article_id, version, content, comment, created_at
            FROM revisions
            WHERE article_id = ?
            ORDER BY version DESC
            "#,
        )
        .bind(article_id)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(Revision::try_from)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_article_and_version(
        &self,
        article_id: &str,
        version: u32,
    ) -> FolioResult<Option<Revision>> {
        debug!("Finding revision {} of article: {}", version, article_id);

        let row = sqlx::query_as::<_, RevisionRow>(
            r#"
            SELECT revision_id, article_id, version, content, comment, created_at
            FROM revisions
            WHERE article_id = ? AND version = ?
            "#,
        )
        .bind(article_id)
        .bind(version)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Revision::try_from).transpose()
    }

    async fn save(&self, revision: &Revision) -> FolioResult<()> {
        debug!(
            "Saving revision {} of article {}",
            revision.version, revision.article_id
        );

        sqlx::query(
            r#"
            INSERT INTO revisions (revision_id, article_id, version, content, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(revision.revision_id.to_string())
        .bind(&revision.article_id)
        .bind(revision.version)
        .bind(&revision.content)
        .bind(&revision.comment)
        .bind(revision.created_at)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}

impl std::fmt::Debug for MySqlRevisionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlRevisionRepository").finish_non_exhaustive()
    }
}
