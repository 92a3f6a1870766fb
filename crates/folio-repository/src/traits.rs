//! Repository interfaces consumed by the service layer.
//!
//! Point lookups return `Ok(None)` for a missing entity; errors are reserved
//! for store failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{Article, FolioResult, Interface, Page, PageRequest, Photo, PhotoId, Revision, User};

/// Photo document store.
#[async_trait]
pub trait PhotoRepository: Interface + Send + Sync {
    /// Finds a photo by its id.
    async fn find_by_id(&self, id: PhotoId) -> FolioResult<Option<Photo>>;

    /// Lists a user's photos, newest first.
    async fn find_by_user(&self, user_id: &str) -> FolioResult<Vec<Photo>>;

    /// A user's photos uploaded within `[from, to]`, newest first.
    async fn find_by_user_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> FolioResult<Vec<Photo>>;

    /// Inserts a new photo document.
    async fn save(&self, photo: &Photo) -> FolioResult<()>;
}

/// Wiki article store keyed by title.
#[async_trait]
pub trait ArticleRepository: Interface + Send + Sync {
    async fn find_by_title(&self, title: &str) -> FolioResult<Option<Article>>;

    /// Current articles, most recently updated first.
    async fn list(&self, page: PageRequest) -> FolioResult<Page<Article>>;

    /// Inserts or replaces the current version of an article.
    async fn upsert(&self, article: &Article) -> FolioResult<()>;
}

/// Article revision history.
#[async_trait]
pub trait RevisionRepository: Interface + Send + Sync {
    /// All revisions of an article, newest version first.
    async fn find_by_article(&self, article_id: &str) -> FolioResult<Vec<Revision>>;

    async fn find_by_article_and_version(
        &self,
        article_id: &str,
        version: u32,
    ) -> FolioResult<Option<Revision>>;

    async fn save(&self, revision: &Revision) -> FolioResult<()>;
}

/// Registered users.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    async fn find_by_user_id(&self, user_id: &str) -> FolioResult<Option<User>>;

    /// Inserts a new user; an existing id is a `Conflict`.
    async fn create(&self, user: &User) -> FolioResult<()>;
}

/// Binary object storage for original uploads.
#[async_trait]
pub trait BlobRepository: Interface + Send + Sync {
    /// Stores `data` under `name`; returns the blob URL.
    async fn upload(&self, name: &str, data: &[u8], content_type: &str) -> FolioResult<String>;

    async fn delete(&self, name: &str) -> FolioResult<()>;
}
