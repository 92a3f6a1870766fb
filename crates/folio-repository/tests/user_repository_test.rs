//! Integration tests for MySqlUserRepository.
//!
//! Requires Docker to be available on the system.

mod common;

use chrono::SubsecRound;
use common::TestDatabase;
use folio_core::{FolioError, User};
use folio_repository::{MySqlUserRepository, UserRepository};

fn create_test_user(user_id: &str) -> User {
    let mut user = User::new(user_id);
    user.created_at = user.created_at.trunc_subsecs(6);
    user
}

#[tokio::test]
async fn test_create_and_find_by_user_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    let user = create_test_user("u1");
    repo.create(&user).await.expect("Failed to create user");

    let found = repo
        .find_by_user_id("u1")
        .await
        .expect("Query failed")
        .expect("User not found");
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_find_by_user_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    assert!(repo.find_by_user_id("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_user_conflicts() {
    let db = TestDatabase::new().await;
    let repo = MySqlUserRepository::new(db.pool());

    repo.create(&create_test_user("u1")).await.unwrap();

    let err = repo.create(&create_test_user("u1")).await.unwrap_err();
    assert!(matches!(err, FolioError::Conflict(_)));
}
