//! Photo upload write path.

use crate::dto::UploadPhotoRequest;
use async_trait::async_trait;
use folio_cache::cache_keys::classes;
use folio_cache::{CacheInterface, CacheInvalidator, KeySpace};
use folio_core::{FolioResult, Interface, Photo, ValidateExt};
use folio_repository::{BlobRepository, PhotoRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Content type for a file name, by extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

/// Upload service trait.
#[async_trait]
pub trait UploadService: Interface + Send + Sync {
    /// Stores the original file and its photo document.
    async fn upload_photo(&self, request: UploadPhotoRequest) -> FolioResult<Photo>;
}

/// Upload service implementation.
pub struct UploadServiceImpl {
    photos: Arc<dyn PhotoRepository>,
    blobs: Arc<dyn BlobRepository>,
    invalidator: CacheInvalidator,
    keys: KeySpace,
}

impl UploadServiceImpl {
    /// Creates a new upload service.
    #[must_use]
    pub fn new(
        photos: Arc<dyn PhotoRepository>,
        blobs: Arc<dyn BlobRepository>,
        cache: Arc<dyn CacheInterface>,
        keys: KeySpace,
    ) -> Self {
        Self {
            photos,
            blobs,
            invalidator: CacheInvalidator::new(cache),
            keys,
        }
    }

    /// Deletes an orphaned blob in the background.
    fn spawn_blob_cleanup(&self, blob_name: String) {
        let blobs = Arc::clone(&self.blobs);
        tokio::spawn(async move {
            match blobs.delete(&blob_name).await {
                Ok(()) => debug!(blob = %blob_name, "Deleted orphaned blob"),
                Err(e) => warn!(blob = %blob_name, error = %e, "Failed to delete orphaned blob"),
            }
        });
    }
}

#[async_trait]
impl UploadService for UploadServiceImpl {
    async fn upload_photo(&self, request: UploadPhotoRequest) -> FolioResult<Photo> {
        debug!("Uploading photo {} for user {}", request.file_name, request.user_id);

        request.validate_request()?;

        let content_type = content_type_for(&request.file_name);
        let photo = Photo::new(&request.user_id, &request.file_name, &content_type);
        let blob_name = photo.blob_name();

        let url = self
            .blobs
            .upload(&blob_name, &request.data, &content_type)
            .await?;
        debug!(blob = %blob_name, url = %url, "Stored original");

        if let Err(e) = self.photos.save(&photo).await {
            warn!(photo_id = %photo.photo_id, error = %e, "Failed to save photo document");
            self.spawn_blob_cleanup(blob_name);
            return Err(e);
        }

        self.invalidator
            .invalidate(&[
                self.keys.entity(classes::PHOTO, &photo.photo_id.to_string()),
                self.keys.list(classes::PHOTO, &photo.user_id),
            ])
            .await;

        info!("Photo uploaded: {} by user {}", photo.photo_id, photo.user_id);
        Ok(photo)
    }
}

impl std::fmt::Debug for UploadServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadServiceImpl")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
