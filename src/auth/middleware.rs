//! Shared application state, the admin session extractor, and rate limiting.

use super::guard::SessionGuard;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::{KvStore, PageStore, SettingsStore, StoreError};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: PageStore,
    pub settings: SettingsStore,
    pub guard: SessionGuard,
    pub store: Arc<dyn KvStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, config: Config) -> Self {
        Self {
            pages: PageStore::new(store.clone()),
            settings: SettingsStore::new(store.clone()),
            guard: SessionGuard::from_config(&config),
            store,
            config: Arc::new(config),
        }
    }
}

/// Proof that the request carries a valid admin session cookie.
///
/// Mutating handlers take this as their first extractor, so anonymous
/// requests are rejected with 403 before the body is read or the store is
/// touched.
#[derive(Debug)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.guard.is_authed(&parts.headers) {
            tracing::debug!(path = %parts.uri.path(), "Rejected request without valid session");
            return Err(AppError::Forbidden("Forbidden".to_string()));
        }
        Ok(AdminSession)
    }
}

/// Check rate limit with an expiring counter.
///
/// # Arguments
/// * `store` - Backing store
/// * `key` - Rate limit key (e.g., "ratelimit:login:127.0.0.1")
/// * `max` - Maximum requests allowed in window
/// * `window_secs` - Time window in seconds
///
/// # Returns
/// * `Ok(true)` if under limit
/// * `Ok(false)` if limit exceeded
pub async fn check_rate_limit(
    store: &dyn KvStore,
    key: &str,
    max: u32,
    window_secs: u64,
) -> Result<bool, StoreError> {
    let count = store.incr(key, window_secs).await?;
    Ok(count <= u64::from(max))
}
