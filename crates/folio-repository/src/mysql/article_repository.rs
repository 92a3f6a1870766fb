//! MySQL article repository implementation.

use crate::{traits::ArticleRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{Article, FolioResult, Page, PageRequest};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

#[derive(Component, Clone)]
#[shaku(interface = ArticleRepository)]
pub struct MySqlArticleRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlArticleRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    title: String,
    content: String,
    version: u32,
    updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            title: row.title,
            content: row.content,
            version: row.version,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ArticleRepository for MySqlArticleRepository {
    async fn find_by_title(&self, title: &str) -> FolioResult<Option<Article>> {
        debug!("Finding article by title: {}", title);

        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT title, content, version, updated_at FROM articles WHERE title = ?",
        )
        .bind(title)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Article::from))
    }

    async fn list(&self, page: PageRequest) -> FolioResult<Page<Article>> {
        debug!("Listing articles, offset: {}, limit: {}", page.offset, page.limit);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT title, content, version, updated_at
            FROM articles
            ORDER BY updated_at DESC, title ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.offset as i64)
        .fetch_all(self.pool.inner())
        .await?;

        let articles = rows.into_iter().map(Article::from).collect();
        Ok(Page::new(articles, page, total as u64))
    }

    async fn upsert(&self, article: &Article) -> FolioResult<()> {
        debug!("Upserting article {} (v{})", article.title, article.version);

        sqlx::query(
            r#"
            INSERT INTO articles (title, content, version, updated_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                content = VALUES(content),
                version = VALUES(version),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.version)
        .bind(article.updated_at)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}

impl std::fmt::Debug for MySqlArticleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlArticleRepository").finish_non_exhaustive()
    }
}
