//! Locate the access token on an incoming request.
//!
//! Lookup order:
//! 1. `token` cookie
//! 2. `Authorization: Bearer <token>` (prefix is case-sensitive, one space)
//!
//! Nothing else (query string, body, other headers) is consulted.

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::CookieJar;

pub const TOKEN_COOKIE: &str = "token";
const BEARER_PREFIX: &str = "Bearer ";

pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
