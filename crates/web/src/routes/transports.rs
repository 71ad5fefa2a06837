//! Fleet management route handlers.
//!
//! Every logged-in user can browse the fleet; only admins mutate it.
//! Validation failures re-render the form with per-field messages and the
//! submitted values preserved.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use veloport_core::{Action, TransportId, TransportStatus};

use crate::db::RepositoryError;
use crate::db::transports::TransportRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::{RequireAuth, authorize, push_notice, take_notices};
use crate::models::{CurrentUser, Notice, Transport, TransportDraft, TransportFieldErrors};
use crate::state::AppState;

/// Fallback route for denied or failed fleet actions.
const FLEET_FALLBACK: &str = "/transports";

// =============================================================================
// Query & View Types
// =============================================================================

/// Query parameters for the transport listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: String,
}

/// Transport view for the listing template.
#[derive(Debug, Clone)]
pub struct TransportListItem {
    pub id: i64,
    pub kind: &'static str,
    pub model: String,
    pub status: &'static str,
    pub price_per_hour: String,
    pub location: String,
}

impl From<&Transport> for TransportListItem {
    fn from(transport: &Transport) -> Self {
        Self {
            id: transport.id.as_i64(),
            kind: transport.kind.as_str(),
            model: transport.model.clone(),
            status: transport.status.as_str(),
            price_per_hour: format!("{:.2}", transport.price_per_hour),
            location: transport.location.clone().unwrap_or_default(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Transport listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "transports/index.html")]
pub struct TransportsIndexTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub transports: Vec<TransportListItem>,
    pub filter: String,
    pub is_admin: bool,
}

/// Transport add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "transports/form.html")]
pub struct TransportFormTemplate {
    pub current_user: Option<CurrentUser>,
    pub notices: Vec<Notice>,
    pub title: &'static str,
    pub action: String,
    pub draft: TransportDraft,
    pub errors: TransportFieldErrors,
}

// =============================================================================
// Listing
// =============================================================================

/// Transport listing with an optional status filter.
///
/// An unrecognized or absent filter silently yields the full list.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<TransportsIndexTemplate, AppError> {
    let filter = query.status.parse::<TransportStatus>().ok();

    let transports = TransportRepository::new(state.pool())
        .list(filter)
        .await?
        .iter()
        .map(TransportListItem::from)
        .collect();

    Ok(TransportsIndexTemplate {
        notices: take_notices(&session).await,
        transports,
        filter: filter.map(|s| s.as_str().to_owned()).unwrap_or_default(),
        is_admin: user.is_admin(),
        current_user: Some(user),
    })
}

// =============================================================================
// Add
// =============================================================================

/// Display the add form (admin only).
pub async fn add_page(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageTransport,
        FLEET_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    Ok(TransportFormTemplate {
        notices: take_notices(&session).await,
        title: "Add transport",
        action: "/transport/add".to_owned(),
        draft: TransportDraft::default(),
        errors: TransportFieldErrors::default(),
        current_user: Some(user),
    }
    .into_response())
}

/// Create a transport record (admin only).
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(draft): Form<TransportDraft>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageTransport,
        FLEET_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    let fields = match draft.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(TransportFormTemplate {
                notices: vec![Notice::error("Please correct the errors below.")],
                title: "Add transport",
                action: "/transport/add".to_owned(),
                draft,
                errors,
                current_user: Some(user),
            }
            .into_response());
        }
    };

    let transport = TransportRepository::new(state.pool()).create(&fields).await?;
    tracing::info!(transport_id = %transport.id, "Transport created");

    push_notice(&session, Notice::success("Transport added.")).await;
    Ok(Redirect::to(FLEET_FALLBACK).into_response())
}

// =============================================================================
// Edit
// =============================================================================

/// Display the edit form (admin only).
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageTransport,
        FLEET_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    let id = TransportId::new(id);
    let Some(transport) = TransportRepository::new(state.pool()).get_by_id(id).await? else {
        push_notice(&session, Notice::error("Transport not found.")).await;
        return Ok(Redirect::to(FLEET_FALLBACK).into_response());
    };

    Ok(TransportFormTemplate {
        notices: take_notices(&session).await,
        title: "Edit transport",
        action: format!("/transport/edit/{id}"),
        draft: TransportDraft::from_transport(&transport),
        errors: TransportFieldErrors::default(),
        current_user: Some(user),
    }
    .into_response())
}

/// Update a transport record (admin only).
pub async fn edit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(draft): Form<TransportDraft>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageTransport,
        FLEET_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    let id = TransportId::new(id);

    let fields = match draft.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(TransportFormTemplate {
                notices: vec![Notice::error("Please correct the errors below.")],
                title: "Edit transport",
                action: format!("/transport/edit/{id}"),
                draft,
                errors,
                current_user: Some(user),
            }
            .into_response());
        }
    };

    match TransportRepository::new(state.pool()).update(id, &fields).await {
        Ok(_) => {
            push_notice(&session, Notice::success("Transport updated.")).await;
        }
        Err(RepositoryError::NotFound) => {
            push_notice(&session, Notice::error("Transport not found.")).await;
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    Ok(Redirect::to(FLEET_FALLBACK).into_response())
}

// =============================================================================
// Delete
// =============================================================================

/// Delete a transport record (admin only).
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if let Err(denied) = authorize(
        &session,
        &user.actor(),
        Action::ManageTransport,
        FLEET_FALLBACK,
    )
    .await
    {
        return Ok(denied);
    }

    match TransportRepository::new(state.pool())
        .delete(TransportId::new(id))
        .await
    {
        Ok(()) => {
            push_notice(&session, Notice::success("Transport deleted.")).await;
        }
        Err(RepositoryError::NotFound) => {
            push_notice(&session, Notice::error("Transport not found.")).await;
        }
        Err(e) => return Err(AppError::Database(e)),
    }

    Ok(Redirect::to(FLEET_FALLBACK).into_response())
}
