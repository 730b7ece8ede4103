//! API route handlers.

pub mod auth;
pub mod body;
pub mod pages;
pub mod settings;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use axum::{routing::get, routing::post, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Longest page id accepted from a request.
const MAX_PAGE_ID_LEN: usize = 64;

/// Validate a page id taken from a request (alphanumeric, hyphens, underscores).
///
/// Commas would corrupt the stored page list and colons would escape the
/// key namespace, so both are refused along with everything else.
pub fn validate_page_id(id: &str) -> Result<(), AppError> {
    if id.is_empty()
        || id.len() > MAX_PAGE_ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest("Invalid page id format".to_string()));
    }
    Ok(())
}

/// Fallback for unknown `/api/*` paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Session endpoints
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/session", get(auth::session_status))
        // Page endpoints
        .route(
            "/api/pages",
            get(pages::list_pages).post(pages::create_page),
        )
        .route(
            "/api/page/{id}",
            get(pages::get_page).delete(pages::delete_page),
        )
        .route("/api/delete/{id}", post(pages::delete_page))
        .route("/api/save", post(pages::save_page))
        // Settings endpoints
        .route("/api/bg", get(settings::get_background))
        .route("/api/save-bg", post(settings::save_background))
        .route("/api/opacity", get(settings::get_opacity))
        .route("/api/save-opacity", post(settings::save_opacity))
        .route("/api/{*rest}", axum::routing::any(not_found))
}

/// Build the full application: API routes, static file fallback, body limit,
/// CORS, and security headers.
pub fn app(state: AppState) -> Router {
    // CorsLayer::new() with no allowed origins rejects all cross-origin requests.
    let cors = CorsLayer::new();

    api_router()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_body_bytes,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(crate::middleware::security_headers))
        .with_state(state)
}
