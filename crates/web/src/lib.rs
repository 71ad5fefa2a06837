//! Veloport web application library.
//!
//! A small transport rental service: visitors see fleet availability,
//! registered users browse the fleet, admins manage transports and
//! accounts. Exposed as a library so the HTTP surface can be tested
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application, session layer included.
///
/// # Errors
///
/// Returns an error if the session store's table cannot be created.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let store = middleware::session::create_session_store(state.pool());
    store.migrate().await?;
    let session_layer = middleware::session::create_session_layer(store, state.config());

    Ok(routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state))
}
