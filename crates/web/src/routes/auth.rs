//! Authentication route handlers.
//!
//! Login, registration, and logout. Failed submissions re-render the
//! originating form with the entered username preserved; passwords are
//! never echoed back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::{
    OptionalAuth, RequireAuth, clear_current_user, push_notice, set_current_user, take_notices,
};
use crate::models::{CurrentUser, Notice};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Minimum username length at registration.
const MIN_USERNAME_LENGTH: usize = 4;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub username: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Already-authenticated visitors are sent home.
pub async fn login_page(
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Response {
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        current_user: None,
        notices: take_notices(&session).await,
        username: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    OptionalAuth(current_user): OptionalAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if current_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let auth = AuthService::new(state.pool());

    match auth.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            push_notice(&session, Notice::success("You are now logged in.")).await;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => {
            // Uniform message for unknown user and wrong password alike.
            tracing::debug!(error = %e, "Login failed");
            Ok(LoginTemplate {
                current_user: None,
                notices: vec![Notice::error("Invalid username or password.")],
                username: form.username,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
///
/// Already-authenticated visitors are sent home.
pub async fn register_page(
    OptionalAuth(current_user): OptionalAuth,
    session: Session,
) -> Response {
    if current_user.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate {
        current_user: None,
        notices: take_notices(&session).await,
        username: String::new(),
    }
    .into_response()
}

/// Handle registration form submission.
pub async fn register(
    OptionalAuth(current_user): OptionalAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if current_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    if let Some(message) = validate_registration(&form) {
        return Ok(register_failure(message, form.username));
    }

    let auth = AuthService::new(state.pool());

    match auth.register(&form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "New account registered");
            push_notice(
                &session,
                Notice::success("Registration successful. Please log in."),
            )
            .await;
            Ok(Redirect::to("/login").into_response())
        }
        Err(AuthError::DuplicateUsername) => Ok(register_failure(
            "That username is already taken.",
            form.username,
        )),
        Err(AuthError::InvalidUsername(e)) => {
            Ok(register_failure(format!("Invalid username: {e}."), form.username))
        }
        Err(AuthError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            Ok(register_failure("Registration failed.", form.username))
        }
    }
}

/// Check the parts of a registration the auth service doesn't own.
fn validate_registration(form: &RegisterForm) -> Option<&'static str> {
    if form.username.chars().count() < MIN_USERNAME_LENGTH {
        return Some("Username must be at least 4 characters long.");
    }
    if form.password.is_empty() {
        return Some("Password must not be empty.");
    }
    if form.password != form.confirm {
        return Some("Passwords do not match.");
    }
    None
}

/// Re-render the registration form with an error notice.
fn register_failure(message: impl Into<String>, username: String) -> Response {
    RegisterTemplate {
        current_user: None,
        notices: vec![Notice::error(message)],
        username,
    }
    .into_response()
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the whole session rather than only removing the user key.
pub async fn logout(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<Response, AppError> {
    clear_current_user(&session).await?;
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }

    push_notice(&session, Notice::success("You have been logged out.")).await;
    Ok(Redirect::to("/").into_response())
}
