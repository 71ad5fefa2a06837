//! Session-related types for authentication.
//!
//! Types stored in the session to identify the logged-in user. There is
//! no ambient authentication state anywhere else: every handler receives
//! the actor explicitly through these types.

use serde::{Deserialize, Serialize};

use veloport_core::{Actor, Role, UserId};

use super::user::User;

/// Session-stored identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's database ID.
    pub id: UserId,
    /// The user's username (for display).
    pub username: String,
    /// The user's role.
    pub role: Role,
}

impl CurrentUser {
    /// The per-request actor this session identity resolves to.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::Authenticated {
            id: self.id,
            role: self.role,
        }
    }

    /// Returns true if the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
            role: user.role,
        }
    }
}

/// Session keys for authentication and notice data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending notices, drained on the next rendered page.
    pub const NOTICES: &str = "notices";
}
