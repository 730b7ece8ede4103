//! Cookie header parsing and Set-Cookie rendering.

use std::collections::HashMap;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "edgenote";

/// Parse a `Cookie` request header into a name-to-value map.
///
/// Pairs are split on `;`, then on the first `=`. Values are URL-decoded;
/// a value that fails to decode is kept as sent. Later duplicates win.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let value = value.trim();
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some((name.trim().to_string(), decoded))
        })
        .collect()
}

/// `Set-Cookie` value that installs the session token for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=Strict",
        SESSION_COOKIE,
        urlencoding::encode(token),
        max_age_secs
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie() -> String {
    format!(
        "{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=Strict",
        SESSION_COOKIE
    )
}
