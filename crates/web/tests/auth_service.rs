//! Integration tests for the authentication service against an
//! in-memory SQLite store.

#![allow(clippy::unwrap_used)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use veloport_core::Role;
use veloport_web::db::MIGRATOR;
use veloport_web::services::auth::{AuthError, AuthService};

async fn test_pool() -> SqlitePool {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn register_then_authenticate() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let user = auth.register("rider", "pedal-power").await.unwrap();
    assert_eq!(user.username.as_str(), "rider");
    assert_eq!(user.role, Role::User);

    let logged_in = auth.authenticate("rider", "pedal-power").await.unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("rider", "pw1").await.unwrap();
    let err = auth.register("rider", "pw2").await.unwrap_err();
    assert!(matches!(err, AuthError::DuplicateUsername));
}

#[tokio::test]
async fn usernames_are_case_sensitive() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("Rider", "pw1").await.unwrap();
    // A different casing is a different account.
    auth.register("rider", "pw2").await.unwrap();

    let err = auth.authenticate("RIDER", "pw1").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn register_rejects_empty_password() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let err = auth.register("rider", "").await.unwrap_err();
    assert!(matches!(err, AuthError::EmptyPassword));
}

#[tokio::test]
async fn authenticate_failures_are_uniform() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("rider", "correct").await.unwrap();

    // Unknown user and wrong password yield the identical error.
    let unknown = auth.authenticate("nobody", "whatever").await.unwrap_err();
    let wrong = auth.authenticate("rider", "incorrect").await.unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn rename_to_own_name_is_noop_success() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let user = auth.register("rider", "pw").await.unwrap();
    let renamed = auth.rename(user.id, "rider").await.unwrap();
    assert_eq!(renamed.username.as_str(), "rider");
}

#[tokio::test]
async fn rename_rejects_collision_with_other_account() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    auth.register("alice", "pw").await.unwrap();
    let bob = auth.register("bob", "pw").await.unwrap();

    let err = auth.rename(bob.id, "alice").await.unwrap_err();
    assert!(matches!(err, AuthError::DuplicateUsername));

    // Bob is untouched.
    let bob_after = auth.get_user(bob.id).await.unwrap();
    assert_eq!(bob_after.username.as_str(), "bob");
}

#[tokio::test]
async fn change_password_invalidates_old_one() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let user = auth.register("rider", "old-pw").await.unwrap();
    auth.change_password(user.id, "new-pw").await.unwrap();

    assert!(auth.authenticate("rider", "new-pw").await.is_ok());
    let err = auth.authenticate("rider", "old-pw").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn delete_refuses_self_for_any_role() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let admin = auth.bootstrap_admin().await.unwrap().unwrap();
    let err = auth.delete(admin.id, admin.id).await.unwrap_err();
    assert!(matches!(err, AuthError::SelfDeletion));

    // Still present.
    assert!(auth.get_user(admin.id).await.is_ok());
}

#[tokio::test]
async fn delete_removes_other_account() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let admin = auth.bootstrap_admin().await.unwrap().unwrap();
    let rider = auth.register("rider", "pw").await.unwrap();

    auth.delete(admin.id, rider.id).await.unwrap();
    let err = auth.get_user(rider.id).await.unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn delete_missing_account_is_not_found() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let admin = auth.bootstrap_admin().await.unwrap().unwrap();
    let err = auth
        .delete(admin.id, veloport_core::UserId::new(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn bootstrap_admin_is_idempotent() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let first = auth.bootstrap_admin().await.unwrap();
    assert!(first.is_some());
    let second = auth.bootstrap_admin().await.unwrap();
    assert!(second.is_none());

    let admins: Vec<_> = auth
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .filter(|u| u.role == Role::Admin)
        .collect();
    assert_eq!(admins.len(), 1);

    // The well-known default credentials work.
    let admin = auth.authenticate("admin", "admin123").await.unwrap();
    assert_eq!(admin.role, Role::Admin);
}

#[tokio::test]
async fn bootstrap_is_suppressed_by_renamed_admin() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);

    let admin = auth.bootstrap_admin().await.unwrap().unwrap();
    auth.rename(admin.id, "fleet-boss").await.unwrap();

    // An admin-role account still exists, so no new "admin" is created.
    assert!(auth.bootstrap_admin().await.unwrap().is_none());
    let err = auth.authenticate("admin", "admin123").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}
