//! Photo gallery read paths.

use crate::settings::CacheSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_cache::cache_keys::classes;
use folio_cache::{CacheInterface, ReadThrough};
use folio_core::{FolioError, FolioResult, Interface, Photo, PhotoId};
use folio_repository::PhotoRepository;
use std::sync::Arc;
use tracing::debug;

/// Gallery service trait.
#[async_trait]
pub trait GalleryService: Interface + Send + Sync {
    /// Gets a photo by id.
    async fn get_photo(&self, photo_id: PhotoId) -> FolioResult<Photo>;

    /// Lists a user's photos, newest first. An unknown user has no photos.
    async fn photos_by_user(&self, user_id: &str) -> FolioResult<Vec<Photo>>;

    /// A user's photos uploaded within `[from, to]`, newest first.
    ///
    /// Read straight from the store; ranges are not cached.
    async fn photos_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> FolioResult<Vec<Photo>>;
}

/// Gallery service backed by two read-through accessors.
pub struct GalleryServiceImpl {
    repository: Arc<dyn PhotoRepository>,
    photos: ReadThrough<Photo>,
    lists: ReadThrough<Vec<Photo>>,
}

impl GalleryServiceImpl {
    /// Creates a new gallery service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PhotoRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: &CacheSettings,
    ) -> Self {
        let keys = settings.keys.clone();
        let repo = Arc::clone(&repository);
        let photos = ReadThrough::new(
            "photo",
            Arc::clone(&cache),
            move |id| keys.entity(classes::PHOTO, id),
            move |id: String| {
                let repo = Arc::clone(&repo);
                async move {
                    // Ids that do not parse cannot exist in the store.
                    match PhotoId::parse(&id) {
                        Ok(photo_id) => repo.find_by_id(photo_id).await,
                        Err(_) => Ok(None),
                    }
                }
            },
            settings.photo_ttl,
        );

        let keys = settings.keys.clone();
        let repo = Arc::clone(&repository);
        let lists = ReadThrough::new(
            "photo-list",
            cache,
            move |owner| keys.list(classes::PHOTO, owner),
            move |owner: String| {
                let repo = Arc::clone(&repo);
                async move { repo.find_by_user(&owner).await.map(Some) }
            },
            settings.list_ttl,
        );

        Self {
            repository,
            photos,
            lists,
        }
    }

    /// The single-photo accessor.
    #[must_use]
    pub fn photo_accessor(&self) -> &ReadThrough<Photo> {
        &self.photos
    }

    /// The per-user list accessor.
    #[must_use]
    pub fn list_accessor(&self) -> &ReadThrough<Vec<Photo>> {
        &self.lists
    }
}

#[async_trait]
impl GalleryService for GalleryServiceImpl {
    async fn get_photo(&self, photo_id: PhotoId) -> FolioResult<Photo> {
        debug!("Getting photo: {}", photo_id);

        self.photos
            .get(&photo_id.to_string())
            .await?
            .ok_or_else(|| FolioError::not_found("Photo", photo_id))
    }

    async fn photos_by_user(&self, user_id: &str) -> FolioResult<Vec<Photo>> {
        debug!("Listing photos of user: {}", user_id);

        Ok(self.lists.get(user_id).await?.unwrap_or_default())
    }

    async fn photos_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> FolioResult<Vec<Photo>> {
        debug!("Listing photos of user {} between {} and {}", user_id, from, to);

        if from > to {
            return Err(FolioError::validation(format!(
                "Range start {} is after its end {}",
                from, to
            )));
        }
        self.repository.find_by_user_between(user_id, from, to).await
    }
}

impl std::fmt::Debug for GalleryServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryServiceImpl")
            .field("photos", &self.photos)
            .field("lists", &self.lists)
            .finish()
    }
}
