//! In-memory repository implementations.
//!
//! Used for local development without MySQL and as test doubles for the
//! service layer. Each store counts its reads so callers can assert how often
//! the backing store was actually hit.

use crate::traits::{
    ArticleRepository, BlobRepository, PhotoRepository, RevisionRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    Article, FolioError, FolioResult, Page, PageRequest, Photo, PhotoId, Revision, User,
};
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory photo store.
#[derive(Component, Default)]
#[shaku(interface = PhotoRepository)]
pub struct InMemoryPhotoRepository {
    #[shaku(default)]
    photos: Mutex<HashMap<PhotoId, Photo>>,
    #[shaku(default)]
    reads: AtomicUsize,
}

impl InMemoryPhotoRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_photos(photos: Vec<Photo>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.photos.lock();
            for photo in photos {
                map.insert(photo.photo_id, photo);
            }
        }
        repo
    }

    /// Number of `find_*` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.photos.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.lock().is_empty()
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn find_by_id(&self, id: PhotoId) -> FolioResult<Option<Photo>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.photos.lock().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> FolioResult<Vec<Photo>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut photos: Vec<Photo> = self
            .photos
            .lock()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        photos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(photos)
    }

    async fn find_by_user_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> FolioResult<Vec<Photo>> {
        let mut photos = self.find_by_user(user_id).await?;
        photos.retain(|p| p.uploaded_at >= from && p.uploaded_at <= to);
        Ok(photos)
    }

    async fn save(&self, photo: &Photo) -> FolioResult<()> {
        let mut photos = self.photos.lock();
        if photos.contains_key(&photo.photo_id) {
            return Err(FolioError::Conflict(format!(
                "Photo {} already exists",
                photo.photo_id
            )));
        }
        photos.insert(photo.photo_id, photo.clone());
        Ok(())
    }
}

/// In-memory article store.
#[derive(Component, Default)]
#[shaku(interface = ArticleRepository)]
pub struct InMemoryArticleRepository {
    #[shaku(default)]
    articles: Mutex<HashMap<String, Article>>,
    #[shaku(default)]
    reads: AtomicUsize,
}

impl InMemoryArticleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn find_by_title(&self, title: &str) -> FolioResult<Option<Article>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.articles.lock().get(title).cloned())
    }

    async fn list(&self, page: PageRequest) -> FolioResult<Page<Article>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut articles: Vec<Article> = self.articles.lock().values().cloned().collect();
        articles.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        let total = articles.len() as u64;
        let content = articles
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();
        Ok(Page::new(content, page, total))
    }

    async fn upsert(&self, article: &Article) -> FolioResult<()> {
        self.articles
            .lock()
            .insert(article.title.clone(), article.clone());
        Ok(())
    }
}

/// In-memory revision history.
#[derive(Component, Default)]
#[shaku(interface = RevisionRepository)]
pub struct InMemoryRevisionRepository {
    #[shaku(default)]
    revisions: Mutex<Vec<Revision>>,
    #[shaku(default)]
    reads: AtomicUsize,
}

impl InMemoryRevisionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RevisionRepository for InMemoryRevisionRepository {
    async fn find_by_article(&self, article_id: &str) -> FolioResult<Vec<Revision>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut revisions: Vec<Revision> = self
            .revisions
            .lock()
            .iter()
            .filter(|r| r.article_id == article_id)
            .cloned()
            .collect();
        revisions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(revisions)
    }

    async fn find_by_article_and_version(
        &self,
        article_id: &str,
        version: u32,
    ) -> FolioResult<Option<Revision>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .revisions
            .lock()
            .iter()
            .find(|r| r.article_id == article_id && r.version == version)
            .cloned())
    }

    async fn save(&self, revision: &Revision) -> FolioResult<()> {
        let mut revisions = self.revisions.lock();
        if revisions
            .iter()
            .any(|r| r.article_id == revision.article_id && r.version == revision.version)
        {
            return Err(FolioError::Conflict(format!(
                "Revision {} of {} already exists",
                revision.version, revision.article_id
            )));
        }
        revisions.push(revision.clone());
        Ok(())
    }
}

/// In-memory user store.
#[derive(Component, Default)]
#[shaku(interface = UserRepository)]
pub struct InMemoryUserRepository {
    #[shaku(default)]
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_user_id(&self, user_id: &str) -> FolioResult<Option<User>> {
        Ok(self.users.lock().get(user_id).cloned())
    }

    async fn create(&self, user: &User) -> FolioResult<()> {
        let mut users = self.users.lock();
        if users.contains_key(&user.user_id) {
            return Err(FolioError::Conflict(format!(
                "User {} already exists",
                user.user_id
            )));
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }
}

/// In-memory blob store. URLs take the form `memory://<name>`.
#[derive(Component, Default)]
#[shaku(interface = BlobRepository)]
pub struct InMemoryBlobRepository {
    #[shaku(default)]
    blobs: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryBlobRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blobs.lock().contains_key(name)
    }

    /// Returns the stored content type of a blob.
    pub fn content_type(&self, name: &str) -> Option<String> {
        self.blobs.lock().get(name).map(|(ct, _)| ct.clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

#[async_trait]
impl BlobRepository for InMemoryBlobRepository {
    async fn upload(&self, name: &str, data: &[u8], content_type: &str) -> FolioResult<String> {
        self.blobs
            .lock()
            .insert(name.to_string(), (content_type.to_string(), data.to_vec()));
        Ok(format!("memory://{}", name))
    }

    async fn delete(&self, name: &str) -> FolioResult<()> {
        self.blobs.lock().remove(name);
        Ok(())
    }
}
