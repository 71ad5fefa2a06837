//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] veloport_core::UsernameError),

    /// Invalid credentials (wrong password or unknown user).
    ///
    /// Deliberately the same variant for both causes so login failures
    /// don't reveal whether an account exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already taken by another account.
    #[error("username already taken")]
    DuplicateUsername,

    /// Empty password submitted where one is required.
    #[error("password must not be empty")]
    EmptyPassword,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// An account may not delete itself.
    #[error("cannot delete own account")]
    SelfDeletion,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
