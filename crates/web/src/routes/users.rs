//! User management route handlers (admin only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;

use veloport_core::{Action, UserId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::{RequireAuth, authorize, push_notice, take_notices};
use crate::models::{CurrentUser, Notice, User};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Fallback route for denied or failed account actions.
const USERS_FALLBACK: &str = "/users";

// =============================================================================
// Form & View Types
// =============================================================================

/// User edit form data.
///
/// An empty password leaves the password unchanged.
#[derive(Debug, Deserialize)]
pub struct UserEditForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User view for the listing template.
#[derive(Debug, Clone)]
pub struct UserListItem {
    pub id: i64,
    pub username: String,
    pub role: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserListItem {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.to_string(),
            role: user.role.as_str(),
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// User listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub users: Vec<UserListItem>,
}

/// User edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub user_id: i64,
    pub username: String,
}

// =============================================================================
// Listing
// =============================================================================

/// User listing (admin only).
///
/// Denied viewers fall back to the home page, not the user list they
/// were refused.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(&session, &user.actor(), Action::ViewUsers, "/").await {
        return Ok(denied);
    }

    let users = AuthService::new(state.pool())
        .list_users()
        .await
        .map_err(auth_to_app_error)?
        .iter()
        .map(UserListItem::from)
        .collect();

    Ok(UsersIndexTemplate {
        notices: take_notices(&session).await,
        users,
        current_user: Some(user),
    }
    .into_response())
}

// =============================================================================
// Edit
// =============================================================================

/// Display the user edit form (admin only).
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageUsers,
        USERS_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    let target = match AuthService::new(state.pool()).get_user(UserId::new(id)).await {
        Ok(target) => target,
        Err(AuthError::UserNotFound) => {
            push_notice(&session, Notice::error("User not found.")).await;
            return Ok(Redirect::to(USERS_FALLBACK).into_response());
        }
        Err(e) => return Err(auth_to_app_error(e)),
    };

    Ok(UserEditTemplate {
        notices: take_notices(&session).await,
        user_id: target.id.as_i64(),
        username: target.username.to_string(),
        current_user: Some(user),
    }
    .into_response())
}

/// Rename a user and optionally reset their password (admin only).
pub async fn edit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<UserEditForm>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageUsers,
        USERS_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    let target_id = UserId::new(id);
    let auth = AuthService::new(state.pool());

    if let Err(e) = auth.rename(target_id, &form.username).await {
        return match e {
            AuthError::DuplicateUsername => Ok(edit_failure(
                "That username is already taken.",
                id,
                form.username,
                user,
            )),
            AuthError::InvalidUsername(e) => Ok(edit_failure(
                format!("Invalid username: {e}."),
                id,
                form.username,
                user,
            )),
            AuthError::UserNotFound => {
                push_notice(&session, Notice::error("User not found.")).await;
                Ok(Redirect::to(USERS_FALLBACK).into_response())
            }
            other => Err(auth_to_app_error(other)),
        };
    }

    // Empty password field means "leave unchanged".
    if !form.password.is_empty() {
        match auth.change_password(target_id, &form.password).await {
            Ok(()) => {}
            Err(AuthError::UserNotFound) => {
                push_notice(&session, Notice::error("User not found.")).await;
                return Ok(Redirect::to(USERS_FALLBACK).into_response());
            }
            Err(e) => return Err(auth_to_app_error(e)),
        }
    }

    push_notice(&session, Notice::success("User updated.")).await;
    Ok(Redirect::to(USERS_FALLBACK).into_response())
}

/// Re-render the edit form with an error notice.
fn edit_failure(
    message: impl Into<String>,
    user_id: i64,
    username: String,
    current_user: CurrentUser,
) -> Response {
    UserEditTemplate {
        notices: vec![Notice::error(message)],
        user_id,
        username,
        current_user: Some(current_user),
    }
    .into_response()
}

// =============================================================================
// Delete
// =============================================================================

/// Delete a user (admin only). Self-deletion is refused for every role.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let target = UserId::new(id);

    // The role gate only; the self-deletion rule is handled below so it
    // can carry its own message.
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageUsers,
        USERS_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    match AuthService::new(state.pool()).delete(user.id, target).await {
        Ok(()) => {
            push_notice(&session, Notice::success("User deleted.")).await;
        }
        Err(AuthError::SelfDeletion) => {
            push_notice(
                &session,
                Notice::error("You cannot delete your own account."),
            )
            .await;
        }
        Err(AuthError::UserNotFound) => {
            push_notice(&session, Notice::error("User not found.")).await;
        }
        Err(e) => return Err(auth_to_app_error(e)),
    }

    Ok(Redirect::to(USERS_FALLBACK).into_response())
}

/// Map the auth errors no handler branch recovers into `AppError`.
fn auth_to_app_error(e: AuthError) -> AppError {
    match e {
        AuthError::Repository(e) => AppError::Database(e),
        other => AppError::Internal(other.to_string()),
    }
}
