//! Access-control policy.
//!
//! The policy is a pure decision function over an [`Actor`] and an
//! [`Action`]: no I/O, no side effects. Handlers resolve the actor from
//! the session, consult [`allow`] (or [`check`]) before touching a store,
//! and translate a denial into a notice plus a redirect to a safe
//! fallback page. Denial is a normal outcome, never a panic.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// The requester's resolved identity for the duration of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// No authenticated session.
    Anonymous,
    /// A logged-in user with a role.
    Authenticated {
        /// The user's database ID.
        id: UserId,
        /// The user's role.
        role: Role,
    },
}

impl Actor {
    /// Returns the actor's user ID, if authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    /// Returns true if the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Authenticated {
                role: Role::Admin,
                ..
            }
        )
    }
}

/// An action a request may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// View the home page and aggregate fleet statistics.
    ViewHome,
    /// Authenticate with username and password.
    Login,
    /// Create a new account.
    Register,
    /// End the current session.
    Logout,
    /// View the fleet listing, with any status filter.
    ViewTransports,
    /// Change one's own username or password.
    EditOwnProfile,
    /// Create, edit, or delete a transport record.
    ManageTransport,
    /// View the user list.
    ViewUsers,
    /// Rename or reset the password of any user.
    ManageUsers,
    /// Delete the user with the given ID.
    DeleteUser {
        /// The user being deleted.
        target: UserId,
    },
}

/// Signals that the policy denied an action.
///
/// The caller is expected to redirect to a safe fallback view with a
/// user-visible notice; denial never propagates as a failure.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("access denied")]
pub struct AccessDenied;

/// Decide whether `actor` may perform `action`.
///
/// Rules, in priority order:
///
/// 1. Anonymous actors may only view the home page, log in, or register.
/// 2. Regular users may additionally view the fleet, log out, and edit
///    their own profile.
/// 3. Administrators may do everything, except delete their own account -
///    self-deletion is denied regardless of role.
#[must_use]
pub fn allow(actor: &Actor, action: Action) -> bool {
    // Self-deletion is denied for every role.
    if let Action::DeleteUser { target } = action
        && actor.user_id() == Some(target)
    {
        return false;
    }

    match actor {
        Actor::Anonymous => matches!(
            action,
            Action::ViewHome | Action::Login | Action::Register
        ),
        Actor::Authenticated {
            role: Role::User, ..
        } => matches!(
            action,
            Action::ViewHome
                | Action::Login
                | Action::Register
                | Action::Logout
                | Action::ViewTransports
                | Action::EditOwnProfile
        ),
        Actor::Authenticated {
            role: Role::Admin, ..
        } => true,
    }
}

/// [`allow`] as a `Result`, for callers that want `?`-style flow.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the policy denies the action.
pub fn check(actor: &Actor, action: Action) -> Result<(), AccessDenied> {
    if allow(actor, action) {
        Ok(())
    } else {
        Err(AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> Actor {
        Actor::Authenticated {
            id: UserId::new(id),
            role: Role::User,
        }
    }

    fn admin(id: i64) -> Actor {
        Actor::Authenticated {
            id: UserId::new(id),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_anonymous_public_actions_only() {
        let anon = Actor::Anonymous;
        assert!(allow(&anon, Action::ViewHome));
        assert!(allow(&anon, Action::Login));
        assert!(allow(&anon, Action::Register));

        assert!(!allow(&anon, Action::ViewTransports));
        assert!(!allow(&anon, Action::Logout));
        assert!(!allow(&anon, Action::EditOwnProfile));
        assert!(!allow(&anon, Action::ManageTransport));
        assert!(!allow(&anon, Action::ViewUsers));
        assert!(!allow(&anon, Action::ManageUsers));
    }

    #[test]
    fn test_regular_user_cannot_manage() {
        let actor = user(5);
        assert!(allow(&actor, Action::ViewHome));
        assert!(allow(&actor, Action::ViewTransports));
        assert!(allow(&actor, Action::Logout));
        assert!(allow(&actor, Action::EditOwnProfile));

        assert!(!allow(&actor, Action::ManageTransport));
        assert!(!allow(&actor, Action::ViewUsers));
        assert!(!allow(&actor, Action::ManageUsers));
        assert!(!allow(
            &actor,
            Action::DeleteUser {
                target: UserId::new(9)
            }
        ));
    }

    #[test]
    fn test_admin_allowed_everything_but_self_deletion() {
        let actor = admin(1);
        assert!(allow(&actor, Action::ManageTransport));
        assert!(allow(&actor, Action::ViewUsers));
        assert!(allow(&actor, Action::ManageUsers));
        assert!(allow(
            &actor,
            Action::DeleteUser {
                target: UserId::new(2)
            }
        ));

        assert!(!allow(
            &actor,
            Action::DeleteUser {
                target: UserId::new(1)
            }
        ));
    }

    #[test]
    fn test_self_deletion_denied_for_every_role() {
        for actor in [user(3), admin(3)] {
            assert!(!allow(
                &actor,
                Action::DeleteUser {
                    target: UserId::new(3)
                }
            ));
        }
    }

    #[test]
    fn test_check_signals_access_denied() {
        assert_eq!(
            check(&Actor::Anonymous, Action::ManageTransport),
            Err(AccessDenied)
        );
        assert_eq!(check(&admin(1), Action::ManageTransport), Ok(()));
    }
}
