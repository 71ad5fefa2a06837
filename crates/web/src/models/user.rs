//! User domain types.

use chrono::{DateTime, Utc};

use veloport_core::{Role, UserId, Username};

/// A user account (domain type).
///
/// The password credential is deliberately not part of this type; it is
/// only ever handled inside the auth service as an opaque hash.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique, case-sensitive username.
    pub username: Username,
    /// The user's role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
