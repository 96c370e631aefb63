use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const ADMIN_KEY_HEADER: &str = "X-Internal-Api-Key";

pub fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|provided| provided == expected)
}

/// Guards the staff routes: segmentation, booking administration, catalog
/// writes and model retraining.
pub async fn require_internal_api_key(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !is_authorized(request.headers(), &expected) {
        tracing::warn!(path = %request.uri().path(), "rejected admin request without a valid key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": {
                    "code": "UNAUTHORIZED",
                    "message": format!("missing or invalid {ADMIN_KEY_HEADER}"),
                    "details": null
                }
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn key_must_match_exactly() {
        let mut headers = HeaderMap::new();
        assert!(!is_authorized(&headers, "secret"));

        headers.insert(ADMIN_KEY_HEADER, HeaderValue::from_static("Secret"));
        assert!(!is_authorized(&headers, "secret"));

        headers.insert(ADMIN_KEY_HEADER, HeaderValue::from_static("secret"));
        assert!(is_authorized(&headers, "secret"));
    }

    #[test]
    fn empty_configured_key_locks_everything() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_KEY_HEADER, HeaderValue::from_static(""));
        assert!(!is_authorized(&headers, ""));
    }
}
