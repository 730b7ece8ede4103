//! Single-admin authentication: HMAC session token, cookie handling, and
//! the request guard.

pub mod cookie;
pub mod guard;
pub mod middleware;
pub mod token;

pub use guard::SessionGuard;
pub use middleware::{check_rate_limit, AdminSession, AppState};
pub use token::{constant_time_eq, sign, verify, TokenSigner};
