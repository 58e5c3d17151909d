//! Request identification and query extraction.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the caller sent none
//! - Read the `letters` parameter without ever rejecting a request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - First `letters` value wins
//! - Pairs with broken percent-escapes or a `;` are skipped, not decoded lossily

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator producing random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Request ID of a request, or `"unknown"` before one has been assigned.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Extract the `letters` parameter from a raw query string.
///
/// Malformed pairs are dropped before lookup, so an absent, empty or
/// undecodable value all yield an empty string.
pub fn letters_param(query: Option<&str>) -> String {
    query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|pair| !pair.is_empty() && !pair.contains(';') && is_well_escaped(pair))
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
        .find(|(key, _)| key == "letters")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Every `%` is followed by two hex digits.
fn is_well_escaped(pair: &str) -> bool {
    let bytes = pair.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = |at: usize| bytes.get(at).is_some_and(u8::is_ascii_hexdigit);
            if !(hex(i + 1) && hex(i + 2)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
