//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database)
//!
//! # Public
//! GET  /                        - Home page with fleet availability
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login form submission
//! GET  /register                - Registration page
//! POST /register                - Registration form submission
//! GET  /logout                  - Logout
//!
//! # Fleet (any logged-in user can view, admin mutates)
//! GET  /transports              - Transport listing, ?status= filter
//! GET  /transport/add           - Add form (admin)
//! POST /transport/add           - Create transport (admin)
//! GET  /transport/edit/{id}     - Edit form (admin)
//! POST /transport/edit/{id}     - Update transport (admin)
//! POST /transport/delete/{id}   - Delete transport (admin)
//!
//! # Accounts (admin only)
//! GET  /users                   - User listing
//! GET  /user/edit/{id}          - Edit form
//! POST /user/edit/{id}          - Rename / reset password
//! POST /user/delete/{id}        - Delete user
//! ```

pub mod auth;
pub mod home;
pub mod transports;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        // Home
        .route("/", get(home::index))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        // Fleet
        .route("/transports", get(transports::index))
        .route(
            "/transport/add",
            get(transports::add_page).post(transports::add),
        )
        .route(
            "/transport/edit/{id}",
            get(transports::edit_page).post(transports::edit),
        )
        .route("/transport/delete/{id}", post(transports::delete))
        // Accounts
        .route("/users", get(users::index))
        .route("/user/edit/{id}", get(users::edit_page).post(users::edit))
        .route("/user/delete/{id}", post(users::delete))
}

/// Liveness check. Always 200 while the process is serving.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness check. Verifies the database pool answers a trivial query.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
