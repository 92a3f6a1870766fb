//! MySQL photo repository implementation.

use crate::{traits::PhotoRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{FolioError, FolioResult, Photo, PhotoId, PhotoMetadata};
use shaku::Component;
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL photo repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = PhotoRepository)]
pub struct MySqlPhotoRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlPhotoRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a photo.
#[derive(Debug, FromRow)]
struct PhotoRow {
    photo_id: String, // CHAR(36)
    user_id: String,
    file_name: String,
    mime_type: String,
    uploaded_at: DateTime<Utc>,
    metadata: Json<PhotoMetadata>,
}

impl TryFrom<PhotoRow> for Photo {
    type Error = FolioError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        let photo_id = PhotoId::parse(&row.photo_id)
            .map_err(|e| FolioError::Internal(format!("Invalid UUID in database: {}", e)))?;

        Ok(Photo {
            photo_id,
            user_id: row.user_id,
            file_name: row.file_name,
            mime_type: row.mime_type,
            uploaded_at: row.uploaded_at,
            metadata: row.metadata.0,
        })
    }
}

#[async_trait]
impl PhotoRepository for MySqlPhotoRepository {
    async fn find_by_id(&self, id: PhotoId) -> FolioResult<Option<Photo>> {
        debug!("Finding photo by id: {}", id);

        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT photo_id, user_id, file_name, mime_type, uploaded_at, metadata
            FROM photos
            WHERE photo_id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Photo::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> FolioResult<Vec<Photo>> {
        debug!("Finding photos by user: {}", user_id);

        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT photo_id, user_id, file_name, mime_type, uploaded_at, metadata
            FROM photos
            WHERE user_id = ?
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(Photo::try_from)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_user_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> FolioResult<Vec<Photo>> {
        debug!("Finding photos by user {} between {} and {}", user_id, from, to);

        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT photo_id, user_id, file_name, mime_type, uploaded_at, metadata
            FROM photos
            WHERE user_id = ? AND uploaded_at BETWEEN ? AND ?
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(Photo::try_from)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, photo: &Photo) -> FolioResult<()> {
        debug!("Saving photo {} for user {}", photo.photo_id, photo.user_id);

        sqlx::query(
            r#"
            INSERT INTO photos (photo_id, user_id, file_name, mime_type, uploaded_at, metadata)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(photo.photo_id.to_string())
        .bind(&photo.user_id)
        .bind(&photo.file_name)
        .bind(&photo.mime_type)
        .bind(photo.uploaded_at)
        .bind(Json(&photo.metadata))
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}

impl std::fmt::Debug for MySqlPhotoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlPhotoRepository").finish_non_exhaustive()
    }
}
