//! Authentication and account management service.
//!
//! Wraps the user repository with password hashing and the account rules
//! the handlers rely on: uniform login failures, case-sensitive username
//! collisions, the self-deletion guard, and the bootstrap admin account.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use veloport_core::{Role, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Username for the bootstrap administrator account.
const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Initial password for the bootstrap administrator account.
///
/// A well-known default; deployments are expected to change it after
/// first login.
const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Authentication and account management service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account with the `user` role.
    ///
    /// Duplicate detection is left to the store's UNIQUE constraint so
    /// concurrent registrations of the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is malformed.
    /// Returns `AuthError::EmptyPassword` if the password is empty.
    /// Returns `AuthError::DuplicateUsername` if the name is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username)?;

        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &password_hash, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateUsername,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Authenticate with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown username and
    /// for a wrong password alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Rename an account.
    ///
    /// Renaming to the account's own current name is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the new name is malformed.
    /// Returns `AuthError::DuplicateUsername` if another account holds it.
    /// Returns `AuthError::UserNotFound` if the account is gone.
    pub async fn rename(&self, user_id: UserId, new_username: &str) -> Result<User, AuthError> {
        let new_username = Username::parse(new_username)?;

        let current = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if current.username == new_username {
            return Ok(current);
        }

        let user = self
            .users
            .update_username(user_id, &new_username)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateUsername,
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Replace an account's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyPassword` if the new password is empty.
    /// Returns `AuthError::UserNotFound` if the account is gone.
    pub async fn change_password(
        &self,
        user_id: UserId,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let password_hash = hash_password(new_password)?;

        self.users
            .update_password_hash(user_id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(())
    }

    /// Delete an account on behalf of `actor_id`.
    ///
    /// Accounts may never delete themselves, whatever their role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SelfDeletion` if `actor_id == target_id`.
    /// Returns `AuthError::UserNotFound` if the target doesn't exist.
    pub async fn delete(&self, actor_id: UserId, target_id: UserId) -> Result<(), AuthError> {
        if actor_id == target_id {
            return Err(AuthError::SelfDeletion);
        }

        self.users.delete(target_id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Repository(other),
        })?;

        Ok(())
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// List every account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store operation fails.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list_all().await?)
    }

    /// Ensure an administrator account exists.
    ///
    /// Creates the default `admin` account only when no admin-role user
    /// exists, so a renamed or additional admin suppresses re-creation.
    /// Called on every startup; safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store operation fails.
    pub async fn bootstrap_admin(&self) -> Result<Option<User>, AuthError> {
        if self.users.count_by_role(Role::Admin).await? > 0 {
            return Ok(None);
        }

        let username = Username::parse(BOOTSTRAP_ADMIN_USERNAME)?;
        let password_hash = hash_password(BOOTSTRAP_ADMIN_PASSWORD)?;

        match self
            .users
            .create(&username, &password_hash, Role::Admin)
            .await
        {
            Ok(user) => Ok(Some(user)),
            // Lost a startup race to another instance; the admin exists.
            Err(RepositoryError::Conflict(_)) => Ok(None),
            Err(other) => Err(AuthError::Repository(other)),
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
