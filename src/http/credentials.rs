use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};

pub const API_KEY_HEADER: &str = "x-linear-api-key";

fn non_empty(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// First non-empty of: the custom key header, the Authorization header
/// (with any `Bearer ` prefix removed), the configured fallback.
pub fn resolve_api_key(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    if let Some(key) = non_empty(headers.get(API_KEY_HEADER)) {
        return Some(key.to_string());
    }
    let bearer = non_empty(headers.get(AUTHORIZATION))
        // scheme with no credential after it
        .filter(|v| *v != "Bearer")
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim());
    if let Some(key) = bearer {
        return Some(key.to_string());
    }
    fallback
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
}
