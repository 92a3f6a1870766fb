//! Integration tests for MySqlPhotoRepository.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use chrono::{Duration, SubsecRound, Utc};
use common::TestDatabase;
use folio_core::{Photo, PhotoId, PhotoMetadata};
use folio_repository::{MySqlPhotoRepository, PhotoRepository};

fn create_test_photo(user: &str, name: &str, minutes_ago: i64) -> Photo {
    let mut photo = Photo::new(user, name, "image/jpeg");
    photo.uploaded_at = (Utc::now() - Duration::minutes(minutes_ago)).trunc_subsecs(6);
    photo
}

#[tokio::test]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlPhotoRepository::new(db.pool());

    let photo = create_test_photo("u1", "beach.jpg", 0).with_metadata(PhotoMetadata {
        camera_make: "Canon".to_string(),
        focal_length: "50mm".to_string(),
        width: 6000,
        height: 4000,
        ..PhotoMetadata::default()
    });

    repo.save(&photo).await.expect("Failed to save photo");

    let found = repo
        .find_by_id(photo.photo_id)
        .await
        .expect("Query failed")
        .expect("Photo not found");

    assert_eq!(found, photo);
    assert_eq!(found.metadata.camera_make, "Canon");
}

#[tokio::test]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlPhotoRepository::new(db.pool());

    let result = repo.find_by_id(PhotoId::new()).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_by_user_newest_first() {
    let db = TestDatabase::new().await;
    let repo = MySqlPhotoRepository::new(db.pool());

    repo.save(&create_test_photo("u1", "old.jpg", 60)).await.unwrap();
    repo.save(&create_test_photo("u1", "new.jpg", 1)).await.unwrap();
    repo.save(&create_test_photo("u2", "other.jpg", 5)).await.unwrap();

    let photos = repo.find_by_user("u1").await.expect("Query failed");
    let names: Vec<_> = photos.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["new.jpg", "old.jpg"]);

    assert!(repo.find_by_user("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_photo_id_conflicts() {
    let db = TestDatabase::new().await;
    let repo = MySqlPhotoRepository::new(db.pool());

    let photo = create_test_photo("u1", "a.jpg", 0);
    repo.save(&photo).await.unwrap();

    let err = repo.save(&photo).await.unwrap_err();
    assert!(matches!(err, folio_core::FolioError::Conflict(_)));
}

#[tokio::test]
async fn test_find_by_user_between() {
    let db = TestDatabase::new().await;
    let repo = MySqlPhotoRepository::new(db.pool());

    let old = create_test_photo("u1", "old.jpg", 120);
    let mid = create_test_photo("u1", "mid.jpg", 30);
    let new = create_test_photo("u1", "new.jpg", 1);
    let other = create_test_photo("u2", "other.jpg", 30);
    for photo in [&old, &mid, &new, &other] {
        repo.save(photo).await.unwrap();
    }

    let photos = repo
        .find_by_user_between("u1", mid.uploaded_at, new.uploaded_at)
        .await
        .expect("Query failed");

    assert_eq!(photos, vec![new, mid]);
}
