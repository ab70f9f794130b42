//! Session and flash cookies
//!
//! Cookies are read straight from the `Cookie` header; the values this
//! application writes never contain `;` or `,`.

use axum::http::{HeaderMap, HeaderValue, header};

use crate::infrastructure::auth::{Claims, SESSION_HOURS, SessionKeys};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Value of the first cookie called `name`
pub fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Claims of a valid session: `Authorization: Bearer` first, then the
/// session cookie.
pub fn claims(headers: &HeaderMap, keys: &SessionKeys) -> Option<Claims> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer.or_else(|| cookie(headers, SESSION_COOKIE))?;
    match keys.decode_token(&token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Rejected session token: {}", e);
            None
        }
    }
}

pub fn set_session(token: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_HOURS * 3600
    ))
    .ok()
}

pub fn clear_session() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0")
}

pub fn set_flash(message: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    ))
    .ok()
}

pub fn clear_flash() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; HttpOnly; Max-Age=0")
}

/// Only same-site absolute paths are followed after login.
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\")
}
