//! # Folio Repository
//!
//! Data access for photos, wiki articles, their revisions and users.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PhotoRepository>   (domain interface)
//! MySqlPhotoRepository            (MySQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```
//!
//! The [`memory`] module provides in-process stores with the same
//! interfaces for development and tests. Blob storage is only an interface
//! here; deployments plug in their own object store.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use folio_core::{Article, FolioError, PageRequest, Photo, PhotoId, Revision, User};

    fn photo_at(user: &str, name: &str, minutes_ago: i64) -> Photo {
        let mut photo = Photo::new(user, name, "image/jpeg");
        photo.uploaded_at = Utc::now() - Duration::minutes(minutes_ago);
        photo
    }

    #[tokio::test]
    async fn test_photo_save_and_find_by_id() {
        let repo = InMemoryPhotoRepository::new();
        let photo = Photo::new("u1", "a.jpg", "image/jpeg");

        repo.save(&photo).await.unwrap();

        let found = repo.find_by_id(photo.photo_id).await.unwrap();
        assert_eq!(found, Some(photo));
        assert_eq!(repo.read_count(), 1);
    }

    #[tokio::test]
    async fn test_photo_find_by_id_not_found() {
        let repo = InMemoryPhotoRepository::new();
        assert!(repo.find_by_id(PhotoId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_photo_duplicate_save_conflicts() {
        let repo = InMemoryPhotoRepository::new();
        let photo = Photo::new("u1", "a.jpg", "image/jpeg");
        repo.save(&photo).await.unwrap();

        let err = repo.save(&photo).await.unwrap_err();
        assert!(matches!(err, FolioError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_photos_by_user_newest_first() {
        let repo = InMemoryPhotoRepository::with_photos(vec![
            photo_at("u1", "old.jpg", 30),
            photo_at("u1", "new.jpg", 1),
            photo_at("u2", "other.jpg", 5),
        ]);

        let photos = repo.find_by_user("u1").await.unwrap();
        let names: Vec<_> = photos.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["new.jpg", "old.jpg"]);
        assert!(repo.find_by_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_photos_between_is_inclusive_and_per_user() {
        let inside = photo_at("u1", "inside.jpg", 30);
        let repo = InMemoryPhotoRepository::with_photos(vec![
            photo_at("u1", "too-old.jpg", 120),
            inside.clone(),
            photo_at("u1", "too-new.jpg", 1),
            photo_at("u2", "other.jpg", 30),
        ]);

        let from = inside.uploaded_at - Duration::minutes(10);
        let photos = repo
            .find_by_user_between("u1", from, inside.uploaded_at)
            .await
            .unwrap();
        assert_eq!(photos, vec![inside]);
    }

    #[tokio::test]
    async fn test_article_list_pages_most_recent_first() {
        let repo = InMemoryArticleRepository::new();
        for (i, title) in ["A", "B", "C"].into_iter().enumerate() {
            let mut article = Article::next_version(title, "body", None);
            article.updated_at = Utc::now() - Duration::minutes(10 - i as i64);
            repo.upsert(&article).await.unwrap();
        }

        let first = repo.list(PageRequest::new(0, 2)).await.unwrap();
        let titles: Vec<_> = first.content.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);
        assert_eq!(first.total_elements, 3);
        assert!(first.has_more());

        let second = repo.list(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].title, "A");
        assert!(!second.has_more());
    }

    #[tokio::test]
    async fn test_user_create_and_duplicate() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_by_user_id("u1").await.unwrap().is_none());

        let user = User::new("u1");
        repo.create(&user).await.unwrap();
        assert_eq!(repo.find_by_user_id("u1").await.unwrap(), Some(user));

        let err = repo.create(&User::new("u1")).await.unwrap_err();
        assert!(matches!(err, FolioError::Conflict(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_article_upsert_replaces_current_version() {
        let repo = InMemoryArticleRepository::new();
        let v1 = Article::next_version("Rust", "first", None);
        let v2 = Article::next_version("Rust", "second", Some(&v1));

        repo.upsert(&v1).await.unwrap();
        repo.upsert(&v2).await.unwrap();

        let found = repo.find_by_title("Rust").await.unwrap().unwrap();
        assert_eq!(found.version, 2);
        assert_eq!(found.content, "second");
        assert!(repo.find_by_title("Go").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revisions_newest_version_first() {
        let repo = InMemoryRevisionRepository::new();
        let v1 = Article::next_version("Rust", "first", None);
        let v2 = Article::next_version("Rust", "second", Some(&v1));
        repo.save(&Revision::of(&v1, "create")).await.unwrap();
        repo.save(&Revision::of(&v2, "edit")).await.unwrap();

        let revisions = repo.find_by_article("Rust").await.unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].version, 2);
        assert_eq!(revisions[1].comment, "create");
    }

    #[tokio::test]
    async fn test_revision_by_version() {
        let repo = InMemoryRevisionRepository::new();
        let v1 = Article::next_version("Rust", "first", None);
        repo.save(&Revision::of(&v1, "create")).await.unwrap();

        let found = repo.find_by_article_and_version("Rust", 1).await.unwrap();
        assert_eq!(found.map(|r| r.content), Some("first".to_string()));
        assert!(repo
            .find_by_article_and_version("Rust", 2)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_revision_conflicts() {
        let repo = InMemoryRevisionRepository::new();
        let v1 = Article::next_version("Rust", "first", None);
        repo.save(&Revision::of(&v1, "create")).await.unwrap();

        let err = repo.save(&Revision::of(&v1, "again")).await.unwrap_err();
        assert!(matches!(err, FolioError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blob_upload_and_delete() {
        let blobs = InMemoryBlobRepository::new();
        let url = blobs.upload("u1/p.jpg", b"jpeg", "image/jpeg").await.unwrap();

        assert_eq!(url, "memory://u1/p.jpg");
        assert_eq!(blobs.content_type("u1/p.jpg").as_deref(), Some("image/jpeg"));

        blobs.delete("u1/p.jpg").await.unwrap();
        assert!(blobs.is_empty());
    }
}
