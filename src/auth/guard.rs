//! Admin session lifecycle: password login, cookie issue and clear, and the
//! per-request authentication check.
//!
//! There is one identity and no server-side session record. A request is
//! authenticated iff its `edgenote` cookie equals the token derived from the
//! configured secret.

use super::cookie::{clear_cookie, parse_cookies, session_cookie, SESSION_COOKIE};
use super::token::{constant_time_eq, TokenSigner};
use crate::config::Config;
use crate::error::AppError;
use axum::http::{header::COOKIE, HeaderMap};
use zeroize::Zeroizing;

#[derive(Clone)]
pub struct SessionGuard {
    signer: TokenSigner,
    admin_password: Zeroizing<String>,
    max_age_secs: u64,
}

impl SessionGuard {
    pub fn new(
        admin_password: impl Into<String>,
        secret: impl Into<String>,
        max_age_secs: u64,
    ) -> Self {
        Self {
            signer: TokenSigner::new(secret),
            admin_password: Zeroizing::new(admin_password.into()),
            max_age_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.admin_password.as_str(),
            config.secret_key.as_str(),
            config.session_max_age_secs,
        )
    }

    /// Check the admin password and return the `Set-Cookie` value for a new
    /// session.
    ///
    /// Missing and wrong passwords fail the same way.
    pub fn login(&self, password: &str) -> Result<String, AppError> {
        if password.is_empty()
            || !constant_time_eq(password.as_bytes(), self.admin_password.as_bytes())
        {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }
        Ok(session_cookie(&self.signer.token(), self.max_age_secs))
    }

    /// `Set-Cookie` value that ends the session.
    pub fn logout(&self) -> String {
        clear_cookie()
    }

    /// Whether the request carries a valid session cookie.
    pub fn is_authed(&self, headers: &HeaderMap) -> bool {
        let header = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");

        match parse_cookies(&header).get(SESSION_COOKIE) {
            Some(token) => self.signer.verify(token),
            None => false,
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("signer", &self.signer)
            .field("admin_password", &"[REDACTED]")
            .field("max_age_secs", &self.max_age_secs)
            .finish()
    }
}
