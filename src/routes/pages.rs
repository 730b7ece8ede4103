//! Page API endpoints.
//!
//! Reads are public. Create, delete, and save require [`AdminSession`].

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{CreatePageRequest, CreatePageResponse, PagesResponse};
use crate::routes::body::{JsonOrForm, SaveBody};
use crate::routes::validate_page_id;
use crate::storage::DEFAULT_PAGE_ID;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// GET /api/pages — Ordered page ids
pub async fn list_pages(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let pages = state.pages.list_pages().await?;
    Ok(Json(PagesResponse {
        pages: pages.into_vec(),
    }))
}

/// GET /api/page/{id} — Page content and title
///
/// Unknown ids return an empty page titled with the id.
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_page_id(&id)?;
    let page = state.pages.page(&id).await?;
    Ok(Json(page))
}

/// POST /api/pages — Create an empty page
pub async fn create_page(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<CreatePageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.pages.create_page(&req.name).await?;

    tracing::info!(action = "page_created", page_id = %id, "Page created");

    Ok((StatusCode::CREATED, Json(CreatePageResponse { id })))
}

/// DELETE /api/page/{id}, POST /api/delete/{id} — Delete a page
pub async fn delete_page(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_page_id(&id)?;
    state.pages.delete_page(&id).await?;

    tracing::info!(action = "page_deleted", page_id = %id, "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/save — Overwrite page content
pub async fn save_page(
    _admin: AdminSession,
    State(state): State<AppState>,
    SaveBody(req): SaveBody,
) -> Result<impl IntoResponse, AppError> {
    let page_id = req
        .page_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_PAGE_ID.to_string());
    validate_page_id(&page_id)?;
    let content = req.content.unwrap_or_default();

    state.pages.save_page(&page_id, &content).await?;

    tracing::debug!(action = "page_saved", page_id = %page_id, bytes = content.len(), "Page saved");

    Ok(StatusCode::NO_CONTENT)
}
