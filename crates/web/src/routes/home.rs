//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;

use crate::db::transports::TransportRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::{OptionalAuth, take_notices};
use crate::models::{CurrentUser, FleetStats, Notice};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub stats: FleetStats,
}

/// Home page with fleet availability counts, visible to everyone.
pub async fn index(
    OptionalAuth(current_user): OptionalAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<HomeTemplate, AppError> {
    let stats = TransportRepository::new(state.pool()).stats().await?;

    Ok(HomeTemplate {
        current_user,
        notices: take_notices(&session).await,
        stats,
    })
}
