//! Wiki article and revision entities.

use crate::RevisionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of a wiki article, keyed by its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article title (natural key).
    pub title: String,

    /// Current article body.
    pub content: String,

    /// Monotonic version number, starting at 1.
    pub version: u32,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Builds the next version of an article.
    ///
    /// `previous` is the currently stored version, if any.
    #[must_use]
    pub fn next_version(title: impl Into<String>, content: impl Into<String>, previous: Option<&Self>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            version: previous.map_or(1, |p| p.version + 1),
            updated_at: Utc::now(),
        }
    }
}

/// Immutable snapshot of an article at a given version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub revision_id: RevisionId,

    /// Title of the article this revision belongs to.
    pub article_id: String,

    pub version: u32,

    pub content: String,

    /// Editor's change summary.
    pub comment: String,

    pub created_at: DateTime<Utc>,
}

impl Revision {
    /// Snapshots an article with an editor comment.
    #[must_use]
    pub fn of(article: &Article, comment: impl Into<String>) -> Self {
        Self {
            revision_id: RevisionId::new(),
            article_id: article.title.clone(),
            version: article.version,
            content: article.content.clone(),
            comment: comment.into(),
            created_at: article.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_version_starts_at_one() {
        let article = Article::next_version("Rust", "A language", None);
        assert_eq!(article.version, 1);
    }

    #[test]
    fn test_next_version_increments() {
        let v1 = Article::next_version("Rust", "A language", None);
        let v2 = Article::next_version("Rust", "A systems language", Some(&v1));
        assert_eq!(v2.version, 2);
        assert_eq!(v2.title, "Rust");
    }

    #[test]
    fn test_revision_snapshots_article() {
        let article = Article::next_version("Rust", "body", None);
        let revision = Revision::of(&article, "initial");
        assert_eq!(revision.article_id, "Rust");
        assert_eq!(revision.version, 1);
        assert_eq!(revision.content, "body");
        assert_eq!(revision.created_at, article.updated_at);
    }
}
