use crate::http::handlers::bookings::CUSTOMER_ID_HEADER;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;

#[derive(Clone)]
pub struct RateLimitState {
    pub redis_client: redis::Client,
    pub max_per_minute: i64,
}

/// Identifies the caller: the forwarded customer id when present, else the
/// first hop of `x-forwarded-for`.
pub fn client_key(headers: &HeaderMap) -> String {
    let customer = headers
        .get(CUSTOMER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(id) = customer {
        return format!("customer:{id}");
    }

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown");
    format!("ip:{ip}")
}

pub fn window_key(client: &str, now: DateTime<Utc>) -> String {
    format!("bookings:rate:{}:{}", client, now.format("%Y%m%d%H%M"))
}

/// Fixed one-minute window per client. Fails open when redis is down.
pub async fn enforce(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = window_key(&client_key(request.headers()), Utc::now());

    match state.redis_client.get_multiplexed_async_connection().await {
        Ok(mut conn) => {
            let count: i64 = conn.incr(&key, 1).await.unwrap_or(1);
            if count == 1 {
                let _: bool = conn.expire(&key, 120).await.unwrap_or(false);
            }
            if count > state.max_per_minute {
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(serde_json::json!({
                        "error": {
                            "code": "RATE_LIMITED",
                            "message": "rate limit exceeded",
                            "details": null
                        }
                    })),
                )
                    .into_response();
            }
        }
        Err(e) => tracing::debug!("rate limiter skipped: {}", e),
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    #[test]
    fn customer_header_wins_over_forwarded_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        assert_eq!(client_key(&headers), "ip:10.0.0.1");

        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static("7"));
        assert_eq!(client_key(&headers), "customer:7");
    }

    #[test]
    fn anonymous_callers_share_a_bucket() {
        assert_eq!(client_key(&HeaderMap::new()), "ip:unknown");
    }

    #[test]
    fn window_changes_every_minute() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 59).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 1, 10, 16, 0).unwrap();
        assert_eq!(window_key("ip:x", a), "bookings:rate:ip:x:202405011015");
        assert_ne!(window_key("ip:x", a), window_key("ip:x", b));
    }
}
