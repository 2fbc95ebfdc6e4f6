use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use chrono::{DateTime, Utc};

/// Caching policy for a catalog response
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_age: u32,
    pub stale_while_revalidate: u32,
}

/// Compute a weakly-stable quoted ETag from response bytes.
pub fn compute_etag(body: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Build a Cache-Control value using max-age and stale-while-revalidate.
pub fn cache_control(policy: CachePolicy) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "max-age={}, stale-while-revalidate={}",
        policy.max_age, policy.stale_while_revalidate
    ))
    .expect("cache-control header value should be valid")
}

/// Build an RFC 7231 HTTP-date for Last-Modified.
pub fn last_modified(timestamp: DateTime<Utc>) -> HeaderValue {
    HeaderValue::from_str(&timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .expect("last-modified header value should be valid")
}

/// Returns true when `If-None-Match` contains `*` or the exact current ETag.
pub fn if_none_match_matches(headers: &HeaderMap, current_etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|raw| {
            raw.split(',')
                .map(|tag| tag.trim())
                .any(|tag| tag == "*" || tag == current_etag)
        })
        .unwrap_or(false)
}

/// Serve a JSON body with ETag / Last-Modified validators, answering 304
/// when the client already holds the current representation.
pub fn conditional_json(
    request_headers: &HeaderMap,
    body: Vec<u8>,
    policy: CachePolicy,
    modified_at: DateTime<Utc>,
) -> Response {
    let etag = compute_etag(&body);
    let builder = Response::builder()
        .header(header::CACHE_CONTROL, cache_control(policy))
        .header(header::ETAG, etag.as_str())
        .header(header::LAST_MODIFIED, last_modified(modified_at));

    if if_none_match_matches(request_headers, &etag) {
        return builder
            .status(StatusCode::NOT_MODIFIED)
            .body(Body::empty())
            .expect("304 response should be valid");
    }

    builder
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("cached response should be valid")
}
