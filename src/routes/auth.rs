//! Login, logout, and session status.

use crate::auth::middleware::{check_rate_limit, AppState};
use crate::error::AppError;
use crate::models::{LoginRequest, SessionResponse};
use crate::routes::body::JsonOrForm;
use axum::{
    extract::{ConnectInfo, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;

/// Where the browser lands after logging in or out.
const ADMIN_PATH: &str = "/admin";

/// Length of the login attempt window.
const LOGIN_WINDOW_SECS: u64 = 60;

/// POST /api/login — Check password and issue the session cookie
///
/// Attempts are counted per client IP before the password is looked at.
/// An unreadable body counts as a missing password.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<JsonOrForm<LoginRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let rate_limit_key = format!("ratelimit:login:{}", addr.ip());
    let allowed = check_rate_limit(
        state.store.as_ref(),
        &rate_limit_key,
        state.config.rate_limit_login_per_min,
        LOGIN_WINDOW_SECS,
    )
    .await?;

    if !allowed {
        let mut hasher = std::hash::DefaultHasher::new();
        addr.ip().hash(&mut hasher);
        let ip_hash = format!("{:x}", hasher.finish());
        tracing::warn!(action = "rate_limited", endpoint = "login", ip_hash = %ip_hash, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let password = body.map(|JsonOrForm(req)| req.password).unwrap_or_default();

    let cookie = state.guard.login(&password).inspect_err(|_| {
        tracing::warn!(action = "auth_failed", "Invalid admin password");
    })?;

    tracing::info!(action = "auth_success", "Admin logged in");

    Ok((
        StatusCode::FOUND,
        [(SET_COOKIE, cookie), (LOCATION, ADMIN_PATH.to_string())],
    ))
}

/// POST /api/logout — Clear the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!(action = "logout", "Admin logged out");

    (
        StatusCode::FOUND,
        [
            (SET_COOKIE, state.guard.logout()),
            (LOCATION, ADMIN_PATH.to_string()),
        ],
    )
}

/// GET /api/session — Report whether the caller is logged in
pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.guard.is_authed(&headers),
    })
}
