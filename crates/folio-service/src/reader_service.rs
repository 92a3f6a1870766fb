//! Wiki read paths.

use crate::settings::CacheSettings;
use async_trait::async_trait;
use folio_cache::cache_keys::classes;
use folio_cache::{CacheInterface, ReadThrough};
use folio_core::{Article, FolioError, FolioResult, Interface, Page, PageRequest, Revision};
use folio_repository::{ArticleRepository, RevisionRepository};
use std::sync::Arc;
use tracing::debug;

/// Wiki reader service trait.
#[async_trait]
pub trait ReaderService: Interface + Send + Sync {
    /// Gets the current version of an article.
    async fn get_article(&self, title: &str) -> FolioResult<Article>;

    /// Lists an article's revisions, newest version first.
    async fn revisions(&self, title: &str) -> FolioResult<Vec<Revision>>;

    /// Gets one revision of an article.
    async fn get_revision(&self, title: &str, version: u32) -> FolioResult<Revision>;

    /// Lists articles, most recently updated first. Pages are not cached.
    async fn list_articles(&self, page: PageRequest) -> FolioResult<Page<Article>>;
}

/// Identifier of a single revision: `<title>@<version>`.
#[must_use]
pub fn revision_id(title: &str, version: u32) -> String {
    format!("{}@{}", title, version)
}

/// Splits a revision identifier on its last `@`.
fn parse_revision_id(id: &str) -> Option<(&str, u32)> {
    let (title, version) = id.rsplit_once('@')?;
    Some((title, version.parse().ok()?))
}

/// Reader service backed by read-through accessors.
pub struct ReaderServiceImpl {
    catalog: Arc<dyn ArticleRepository>,
    articles: ReadThrough<Article>,
    histories: ReadThrough<Vec<Revision>>,
    revisions: ReadThrough<Revision>,
}

impl ReaderServiceImpl {
    /// Creates a new reader service.
    #[must_use]
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        revisions: Arc<dyn RevisionRepository>,
        cache: Arc<dyn CacheInterface>,
        settings: &CacheSettings,
    ) -> Self {
        let keys = settings.keys.clone();
        let repo = Arc::clone(&articles);
        let article_accessor = ReadThrough::new(
            "article",
            Arc::clone(&cache),
            move |title| keys.entity(classes::ARTICLE, title),
            move |title: String| {
                let repo = Arc::clone(&repo);
                async move { repo.find_by_title(&title).await }
            },
            settings.entity_ttl,
        );

        let keys = settings.keys.clone();
        let repo = Arc::clone(&revisions);
        let history_accessor = ReadThrough::new(
            "revision-list",
            Arc::clone(&cache),
            move |title| keys.list(classes::REVISION, title),
            move |title: String| {
                let repo = Arc::clone(&repo);
                async move { repo.find_by_article(&title).await.map(Some) }
            },
            settings.list_ttl,
        );

        let keys = settings.keys.clone();
        let revision_accessor = ReadThrough::new(
            "revision",
            cache,
            move |id| keys.entity(classes::REVISION, id),
            move |id: String| {
                let repo = Arc::clone(&revisions);
                async move {
                    match parse_revision_id(&id) {
                        Some((title, version)) => {
                            repo.find_by_article_and_version(title, version).await
                        }
                        None => Ok(None),
                    }
                }
            },
            settings.entity_ttl,
        );

        Self {
            catalog: articles,
            articles: article_accessor,
            histories: history_accessor,
            revisions: revision_accessor,
        }
    }
}

#[async_trait]
impl ReaderService for ReaderServiceImpl {
    async fn get_article(&self, title: &str) -> FolioResult<Article> {
        debug!("Getting article: {}", title);

        self.articles
            .get(title)
            .await?
            .ok_or_else(|| FolioError::not_found("Article", title))
    }

    async fn revisions(&self, title: &str) -> FolioResult<Vec<Revision>> {
        debug!("Listing revisions of article: {}", title);

        Ok(self.histories.get(title).await?.unwrap_or_default())
    }

    async fn get_revision(&self, title: &str, version: u32) -> FolioResult<Revision> {
        debug!("Getting revision {} of article: {}", version, title);

        let id = revision_id(title, version);
        self.revisions
            .get(&id)
            .await?
            .ok_or_else(|| FolioError::not_found("Revision", id))
    }

    async fn list_articles(&self, page: PageRequest) -> FolioResult<Page<Article>> {
        debug!("Listing articles: offset={}, limit={}", page.offset, page.limit);

        self.catalog.list(page).await
    }
}

impl std::fmt::Debug for ReaderServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderServiceImpl").finish_non_exhaustive()
    }
}
