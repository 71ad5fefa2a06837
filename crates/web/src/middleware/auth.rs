//! Authentication extractors and session helpers.
//!
//! Provides extractors for requiring authentication in route handlers,
//! plus the notice queue and the policy gate every mutating handler
//! passes through.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use veloport_core::{Action, Actor, policy};

use crate::models::{CurrentUser, Notice, session_keys};

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, queues an info notice and redirects to the
/// login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// Session layer missing (server misconfiguration).
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unavailable)?;

        let user: Option<CurrentUser> = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        match user {
            Some(user) => Ok(Self(user)),
            None => {
                push_notice(session, Notice::info("Please log in to continue.")).await;
                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Gate an action through the access policy.
///
/// On denial, queues an error notice and redirects to `fallback`. The
/// `Err` branch is a ready-made response so handlers can use `?`.
///
/// # Errors
///
/// Returns `Err(Response)` with the notice-and-redirect response if the
/// policy denies the action.
pub async fn authorize(
    session: &Session,
    actor: &Actor,
    action: Action,
    fallback: &str,
) -> Result<(), Response> {
    if policy::allow(actor, action) {
        return Ok(());
    }

    push_notice(
        session,
        Notice::error("You do not have permission to do that."),
    )
    .await;

    Err(Redirect::to(fallback).into_response())
}

/// Set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

/// Queue a notice for the next rendered page.
///
/// A failed session write only loses the message, never the operation,
/// so the error is logged rather than propagated.
pub async fn push_notice(session: &Session, notice: Notice) {
    let mut notices: Vec<Notice> = session
        .get(session_keys::NOTICES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    notices.push(notice);

    if let Err(e) = session.insert(session_keys::NOTICES, &notices).await {
        tracing::warn!(error = %e, "Failed to queue notice");
    }
}

/// Drain all queued notices.
pub async fn take_notices(session: &Session) -> Vec<Notice> {
    match session.remove::<Vec<Notice>>(session_keys::NOTICES).await {
        Ok(notices) => notices.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to drain notices");
            Vec::new()
        }
    }
}
