//! Background image and opacity endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{SaveBackgroundRequest, SaveOpacityRequest};
use crate::routes::body::JsonBody;
use crate::storage::{BackgroundKey, OpacityKey};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// GET /api/bg — Background image URLs
pub async fn get_background(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.settings.get_background_images().await?))
}

/// POST /api/save-bg — Set one background image URL
pub async fn save_background(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveBackgroundRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key: BackgroundKey = req.key.parse()?;
    let url = req.url.unwrap_or_default();

    state.settings.save_background_image(key, &url).await?;

    tracing::info!(action = "background_saved", key = key.as_str(), "Background image updated");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/opacity — Panel opacity values
pub async fn get_opacity(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.settings.get_opacity_settings().await?))
}

/// POST /api/save-opacity — Set one opacity value (clamped)
pub async fn save_opacity(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveOpacityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key: OpacityKey = req.key.parse()?;

    let stored = state.settings.save_opacity_setting(key, &req.value).await?;

    tracing::info!(action = "opacity_saved", key = key.as_str(), value = stored, "Opacity updated");

    Ok(StatusCode::NO_CONTENT)
}
