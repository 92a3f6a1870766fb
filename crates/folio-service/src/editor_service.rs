//! Wiki write path.

use crate::dto::UpdateArticleRequest;
use async_trait::async_trait;
use folio_cache::cache_keys::classes;
use folio_cache::{CacheInterface, CacheInvalidator, KeySpace};
use folio_core::{Article, FolioResult, Interface, Revision, ValidateExt};
use folio_repository::{ArticleRepository, RevisionRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Wiki editor service trait.
#[async_trait]
pub trait EditorService: Interface + Send + Sync {
    /// Writes a new version of an article and records a revision.
    ///
    /// Creates the article at version 1 when it does not exist yet.
    async fn update_article(&self, request: UpdateArticleRequest) -> FolioResult<Article>;
}

/// Editor service implementation.
pub struct EditorServiceImpl {
    articles: Arc<dyn ArticleRepository>,
    revisions: Arc<dyn RevisionRepository>,
    invalidator: CacheInvalidator,
    keys: KeySpace,
}

impl EditorServiceImpl {
    /// Creates a new editor service.
    #[must_use]
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        revisions: Arc<dyn RevisionRepository>,
        cache: Arc<dyn CacheInterface>,
        keys: KeySpace,
    ) -> Self {
        Self {
            articles,
            revisions,
            invalidator: CacheInvalidator::new(cache),
            keys,
        }
    }
}

#[async_trait]
impl EditorService for EditorServiceImpl {
    async fn update_article(&self, request: UpdateArticleRequest) -> FolioResult<Article> {
        debug!("Updating article: {}", request.title);

        request.validate_request()?;

        let current = self.articles.find_by_title(&request.title).await?;
        let article = Article::next_version(&request.title, request.content, current.as_ref());

        self.articles.upsert(&article).await?;

        let revision = Revision::of(&article, request.comment);
        if let Err(e) = self.revisions.save(&revision).await {
            warn!(
                title = %article.title,
                version = article.version,
                error = %e,
                "Failed to record revision"
            );
        }

        self.invalidator
            .invalidate(&[
                self.keys.entity(classes::ARTICLE, &article.title),
                self.keys.list(classes::REVISION, &article.title),
            ])
            .await;

        info!("Article updated: {} (v{})", article.title, article.version);
        Ok(article)
    }
}

impl std::fmt::Debug for EditorServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorServiceImpl")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader_service::{ReaderService, ReaderServiceImpl};
    use crate::settings::CacheSettings;
    use folio_cache::InMemoryCache;
    use folio_core::FolioError;
    use folio_repository::{InMemoryArticleRepository, InMemoryRevisionRepository};
    use std::time::Duration;

    /// Revision store whose writes always fail.
    struct BrokenRevisions;

    #[async_trait]
    impl RevisionRepository for BrokenRevisions {
        async fn find_by_article(&self, _article_id: &str) -> FolioResult<Vec<Revision>> {
            Ok(Vec::new())
        }

        async fn find_by_article_and_version(
            &self,
            _article_id: &str,
            _version: u32,
        ) -> FolioResult<Option<Revision>> {
            Ok(None)
        }

        async fn save(&self, _revision: &Revision) -> FolioResult<()> {
            Err(FolioError::Database("revisions unavailable".to_string()))
        }
    }

    struct Fixture {
        articles: Arc<InMemoryArticleRepository>,
        revisions: Arc<InMemoryRevisionRepository>,
        cache: Arc<InMemoryCache>,
        editor: EditorServiceImpl,
        reader: ReaderServiceImpl,
    }

    fn fixture() -> Fixture {
        let articles = Arc::new(InMemoryArticleRepository::new());
        let revisions = Arc::new(InMemoryRevisionRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let settings = CacheSettings::default();
        let editor = EditorServiceImpl::new(
            articles.clone(),
            revisions.clone(),
            cache.clone(),
            settings.keys.clone(),
        );
        let reader = ReaderServiceImpl::new(
            articles.clone(),
            revisions.clone(),
            cache.clone(),
            &settings,
        );
        Fixture {
            articles,
            revisions,
            cache,
            editor,
            reader,
        }
    }

    async fn populated(cache: &InMemoryCache, key: &str) {
        for _ in 0..100 {
            if cache.ttl(key).is_some() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{key} was never populated");
    }

    #[tokio::test]
    async fn test_first_edit_creates_version_one() {
        let f = fixture();

        let article = f
            .editor
            .update_article(UpdateArticleRequest::new("Rust", "A language", "create"))
            .await
            .unwrap();

        assert_eq!(article.version, 1);
        let revisions = f.revisions.find_by_article("Rust").await.unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].comment, "create");
    }

    #[tokio::test]
    async fn test_edit_bumps_version() {
        let f = fixture();
        f.editor
            .update_article(UpdateArticleRequest::new("Rust", "v1", ""))
            .await
            .unwrap();

        let article = f
            .editor
            .update_article(UpdateArticleRequest::new("Rust", "v2", "expand"))
            .await
            .unwrap();

        assert_eq!(article.version, 2);
        assert_eq!(f.articles.find_by_title("Rust").await.unwrap().unwrap().content, "v2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_edit_invalidates_cached_article_and_history() {
        let f = fixture();
        f.editor
            .update_article(UpdateArticleRequest::new("Rust", "v1", ""))
            .await
            .unwrap();

        assert_eq!(f.reader.get_article("Rust").await.unwrap().version, 1);
        assert_eq!(f.reader.revisions("Rust").await.unwrap().len(), 1);
        populated(&f.cache, "folio:article:Rust").await;
        populated(&f.cache, "folio:revision-list:Rust").await;

        f.editor
            .update_article(UpdateArticleRequest::new("Rust", "v2", ""))
            .await
            .unwrap();

        assert!(f.cache.ttl("folio:article:Rust").is_none());
        assert!(f.cache.ttl("folio:revision-list:Rust").is_none());

        let article = f.reader.get_article("Rust").await.unwrap();
        assert_eq!(article.version, 2);
        assert_eq!(f.reader.revisions("Rust").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_revision_failure_does_not_fail_the_edit() {
        let articles = Arc::new(InMemoryArticleRepository::new());
        let editor = EditorServiceImpl::new(
            articles.clone(),
            Arc::new(BrokenRevisions),
            Arc::new(InMemoryCache::new()),
            KeySpace::default(),
        );

        let article = editor
            .update_article(UpdateArticleRequest::new("Rust", "body", ""))
            .await
            .unwrap();

        assert_eq!(article.version, 1);
        assert!(articles.find_by_title("Rust").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_title_is_rejected_before_any_write() {
        let f = fixture();

        let err = f
            .editor
            .update_article(UpdateArticleRequest::new("a/b", "body", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::Validation(_)));
        assert_eq!(f.articles.read_count(), 0);
    }
}
